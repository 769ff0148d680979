use std::io;

use bmibot_db::{MockRecordStore, StoreError};
use bmibot_model::{
    measurement::{Measurement, MeasurementInput},
    record::BmiRecord,
};
use bmibot_router::{CommandInvocation, Reply, Router, Subcommand, UserRef};
use chrono::Utc;

fn alice() -> UserRef {
    UserRef {
        id: "10".to_owned(),
        display_name: "alice".to_owned(),
    }
}

fn bob() -> UserRef {
    UserRef {
        id: "20".to_owned(),
        display_name: "bob".to_owned(),
    }
}

fn invocation(command: Subcommand) -> CommandInvocation {
    CommandInvocation {
        guild_id: Some("1".to_owned()),
        caller: alice(),
        command,
    }
}

fn stored(user_id: &str, height_cm: f64, weight_kg: f64) -> BmiRecord {
    BmiRecord::new(
        user_id.to_owned(),
        Measurement::new(height_cm, weight_kg).unwrap(),
        Utc::now(),
    )
}

fn disk_failure() -> StoreError {
    StoreError::Io(io::Error::new(io::ErrorKind::Other, "disk full"))
}

#[tokio::test]
async fn set_with_metric_values_saves_record() {
    let mut store = MockRecordStore::new();
    store
        .expect_save()
        .withf(|record| {
            record.user_id() == "10" && record.height_cm() == 180.0 && record.weight_kg() == 80.0
        })
        .times(1)
        .returning(Ok);

    let router = Router::new(Box::new(store));
    let reply = router
        .handle(invocation(Subcommand::Set(MeasurementInput {
            height_cm: Some(180),
            weight_kg: Some(80),
            ..Default::default()
        })))
        .await;

    assert_eq!(
        reply,
        Reply::ephemeral("Saved. Your BMI is 24.7 (Height: 180 cm, Weight: 80 kg).")
    );
}

#[tokio::test]
async fn set_with_imperial_values_converts_units() {
    let mut store = MockRecordStore::new();
    store.expect_save().times(1).returning(Ok);

    let router = Router::new(Box::new(store));
    let reply = router
        .handle(invocation(Subcommand::Set(MeasurementInput {
            height: Some("5'9".to_owned()),
            weight_pounds: Some(150),
            ..Default::default()
        })))
        .await;

    assert_eq!(
        reply,
        Reply::ephemeral("Saved. Your BMI is 22.2 (Height: 175 cm, Weight: 68 kg).")
    );
}

#[tokio::test]
async fn set_prefers_metric_values() {
    let mut store = MockRecordStore::new();
    store
        .expect_save()
        .withf(|record| record.height_cm() == 160.0 && record.weight_kg() == 55.0)
        .times(1)
        .returning(Ok);

    let router = Router::new(Box::new(store));
    let reply = router
        .handle(invocation(Subcommand::Set(MeasurementInput {
            height_cm: Some(160),
            weight_kg: Some(55),
            height: Some("6ft2".to_owned()),
            weight_pounds: Some(220),
        })))
        .await;

    assert!(reply.ephemeral);
    assert!(reply.content.starts_with("Saved. Your BMI is 21.5"));
}

#[tokio::test]
async fn set_with_invalid_input_does_not_touch_store() {
    let test_data = [
        (
            MeasurementInput {
                height_cm: Some(400),
                weight_kg: Some(70),
                ..Default::default()
            },
            "Height or weight looks out of range. Please check your inputs.",
        ),
        (
            MeasurementInput {
                height: Some("tall".to_owned()),
                weight_pounds: Some(150),
                ..Default::default()
            },
            "Could not parse height. Try formats like 5ft9, 5'9, or 175cm.",
        ),
        (
            MeasurementInput::default(),
            "Provide either height_cm + weight_kg OR height + weight_pounds.",
        ),
    ];

    for (i, (input, message)) in test_data.into_iter().enumerate() {
        let router = Router::new(Box::new(MockRecordStore::new()));
        let reply = router.handle(invocation(Subcommand::Set(input))).await;
        assert_eq!(reply, Reply::ephemeral(message), "Test case #{}", i);
    }
}

#[tokio::test]
async fn show_own_record() {
    let mut store = MockRecordStore::new();
    store
        .expect_find()
        .withf(|user_id| user_id == "10")
        .returning(|_| Ok(Some(stored("10", 180.0, 80.0))));

    let router = Router::new(Box::new(store));
    let reply = router.handle(invocation(Subcommand::Show { user: None })).await;

    assert_eq!(reply, Reply::public("alice's BMI is 24.7."));
}

#[tokio::test]
async fn show_other_users_record() {
    let mut store = MockRecordStore::new();
    store
        .expect_find()
        .withf(|user_id| user_id == "20")
        .returning(|_| Ok(Some(stored("20", 170.0, 60.0))));

    let router = Router::new(Box::new(store));
    let reply = router
        .handle(invocation(Subcommand::Show { user: Some(bob()) }))
        .await;

    assert_eq!(reply, Reply::public("bob's BMI is 20.8."));
}

#[tokio::test]
async fn show_missing_records() {
    let test_data = [
        (None, "You have not set your BMI yet. Use /bmi set."),
        (Some(alice()), "You have not set your BMI yet. Use /bmi set."),
        (Some(bob()), "bob has not set a BMI yet."),
    ];

    for (i, (user, message)) in test_data.into_iter().enumerate() {
        let mut store = MockRecordStore::new();
        store.expect_find().returning(|_| Ok(None));

        let router = Router::new(Box::new(store));
        let reply = router.handle(invocation(Subcommand::Show { user })).await;
        assert_eq!(reply, Reply::ephemeral(message), "Test case #{}", i);
    }
}

#[tokio::test]
async fn announce_own_record() {
    let mut store = MockRecordStore::new();
    store
        .expect_find()
        .withf(|user_id| user_id == "10")
        .returning(|_| Ok(Some(stored("10", 180.0, 80.0))));

    let router = Router::new(Box::new(store));
    let reply = router.handle(invocation(Subcommand::Announce)).await;

    assert_eq!(reply, Reply::public("alice's BMI is 24.7."));
}

#[tokio::test]
async fn announce_without_record() {
    let mut store = MockRecordStore::new();
    store.expect_find().returning(|_| Ok(None));

    let router = Router::new(Box::new(store));
    let reply = router.handle(invocation(Subcommand::Announce)).await;

    assert_eq!(
        reply,
        Reply::ephemeral("You have not set your BMI yet. Use /bmi set first.")
    );
}

#[tokio::test]
async fn invocation_outside_of_server_is_refused() {
    let router = Router::new(Box::new(MockRecordStore::new()));
    let reply = router
        .handle(CommandInvocation {
            guild_id: None,
            caller: alice(),
            command: Subcommand::Announce,
        })
        .await;

    assert_eq!(reply, Reply::ephemeral("This bot only works in servers."));
}

#[tokio::test]
async fn store_failures_become_generic_replies() {
    let commands = [
        Subcommand::Set(MeasurementInput {
            height_cm: Some(180),
            weight_kg: Some(80),
            ..Default::default()
        }),
        Subcommand::Show { user: Some(bob()) },
        Subcommand::Announce,
    ];

    for (i, command) in commands.into_iter().enumerate() {
        let mut store = MockRecordStore::new();
        store.expect_save().returning(|_| Err(disk_failure()));
        store.expect_find().returning(|_| Err(disk_failure()));

        let router = Router::new(Box::new(store));
        let reply = router.handle(invocation(command)).await;

        assert!(reply.ephemeral, "Test case #{}", i);
        assert!(!reply.content.contains("disk full"), "Test case #{}", i);
        assert_eq!(
            reply.content, "Something went wrong while accessing BMI data. Please try again later.",
            "Test case #{}",
            i
        );
    }
}
