use async_trait::async_trait;
use bmibot_model::{measurement::Measurement, record::BmiRecord};
use chrono::{DateTime, Utc};
use log::warn;

use crate::error::Result;

/// Keeps the latest BMI record of every user.
#[mockall::automock]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts or fully replaces the record of `record.user_id()`. Returns
    /// only once the record has been written to the backing medium.
    async fn save(&self, record: BmiRecord) -> Result<BmiRecord>;

    /// Looks up the record of a user. Stored data that does not form a valid
    /// record is reported as absent.
    async fn find(&self, user_id: &str) -> Result<Option<BmiRecord>>;
}

/// Rebuilds a record from stored columns. The stored bmi is only checked for
/// sanity, the returned record carries a freshly computed one.
pub(crate) fn restore_record(
    user_id: &str,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    bmi: Option<f64>,
    updated_at: Option<DateTime<Utc>>,
) -> Option<BmiRecord> {
    if !bmi.is_some_and(f64::is_finite) {
        warn!("Stored BMI of user {} is not a number, ignoring", user_id);
        return None;
    }
    let (Some(height_cm), Some(weight_kg), Some(updated_at)) = (height_cm, weight_kg, updated_at)
    else {
        warn!("Stored record of user {} is incomplete, ignoring", user_id);
        return None;
    };
    match Measurement::new(height_cm, weight_kg) {
        Ok(measurement) => Some(BmiRecord::new(user_id.to_owned(), measurement, updated_at)),
        Err(e) => {
            warn!("Stored record of user {} is invalid, ignoring: {}", user_id, e);
            None
        }
    }
}
