use chrono::{DateTime, Utc};

use crate::{bmi, measurement::Measurement};

/// The latest measurement a user has saved. `bmi` is always derived from the
/// measurement and cannot be supplied from outside.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BmiRecord {
    user_id: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    measurement: Measurement,
    bmi: f64,
    updated_at: DateTime<Utc>,
}

impl BmiRecord {
    pub fn new(user_id: String, measurement: Measurement, updated_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            bmi: bmi::compute_bmi(measurement.height_cm(), measurement.weight_kg()),
            measurement,
            updated_at,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    pub fn height_cm(&self) -> f64 {
        self.measurement.height_cm()
    }

    pub fn weight_kg(&self) -> f64 {
        self.measurement.weight_kg()
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
