use bmibot_db::{RecordStore, StoreError};
use bmibot_model::{
    bmi,
    measurement::{self, MeasurementInput},
    record::BmiRecord,
};
use chrono::Utc;
use log::{debug, error, info};

use crate::invocation::{CommandInvocation, Reply, Subcommand, UserRef};

const GUILD_ONLY: &str = "This bot only works in servers.";
const STORE_FAILURE: &str = "Something went wrong while accessing BMI data. Please try again later.";

/// Turns `/bmi` invocations into replies, reading and writing records
/// through the injected store.
pub struct Router {
    store: Box<dyn RecordStore>,
}

impl Router {
    pub fn new(store: Box<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, invocation: CommandInvocation) -> Reply {
        if invocation.guild_id.is_none() {
            debug!("Ignoring invocation by {} outside of a server", invocation.caller.id);
            return Reply::ephemeral(GUILD_ONLY);
        }

        let CommandInvocation { caller, command, .. } = invocation;
        let result = match command {
            Subcommand::Set(input) => self.set(&caller, &input).await,
            Subcommand::Show { user } => self.show(&caller, user.as_ref()).await,
            Subcommand::Announce => self.announce(&caller).await,
        };

        result.unwrap_or_else(|e| {
            error!("Store failure while handling command of {}: {}", caller.id, e);
            Reply::ephemeral(STORE_FAILURE)
        })
    }

    async fn set(&self, caller: &UserRef, input: &MeasurementInput) -> Result<Reply, StoreError> {
        let measurement = match measurement::parse(input) {
            Ok(measurement) => measurement,
            Err(e) => {
                debug!("Rejected input of {}: {:?}", caller.id, e);
                return Ok(Reply::ephemeral(e.to_string()));
            }
        };

        let record = BmiRecord::new(caller.id.clone(), measurement, Utc::now());
        let saved = self.store.save(record).await?;
        info!("Saved BMI record of {}", caller.id);

        Ok(Reply::ephemeral(format!(
            "Saved. Your BMI is {} (Height: {}, Weight: {}).",
            bmi::format_bmi(saved.bmi()),
            bmi::format_height_cm(saved.height_cm()),
            bmi::format_weight_kg(saved.weight_kg()),
        )))
    }

    async fn show(&self, caller: &UserRef, user: Option<&UserRef>) -> Result<Reply, StoreError> {
        let target = user.unwrap_or(caller);
        let reply = match self.store.find(&target.id).await? {
            Some(record) => announcement(target, &record),
            None if target.id == caller.id => {
                Reply::ephemeral("You have not set your BMI yet. Use /bmi set.")
            }
            None => Reply::ephemeral(format!("{} has not set a BMI yet.", target.display_name)),
        };
        Ok(reply)
    }

    async fn announce(&self, caller: &UserRef) -> Result<Reply, StoreError> {
        let reply = match self.store.find(&caller.id).await? {
            Some(record) => announcement(caller, &record),
            None => Reply::ephemeral("You have not set your BMI yet. Use /bmi set first."),
        };
        Ok(reply)
    }
}

fn announcement(user: &UserRef, record: &BmiRecord) -> Reply {
    Reply::public(format!(
        "{}'s BMI is {}.",
        user.display_name,
        bmi::format_bmi(record.bmi())
    ))
}
