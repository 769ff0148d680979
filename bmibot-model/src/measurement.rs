use std::ops::RangeInclusive;

use crate::height;

pub const HEIGHT_CM_RANGE: RangeInclusive<f64> = 50.0..=300.0;
pub const WEIGHT_KG_RANGE: RangeInclusive<f64> = 20.0..=500.0;
pub const WEIGHT_POUNDS_RANGE: RangeInclusive<i64> = 44..=1100;

pub const KG_PER_POUND: f64 = 0.45359237;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Provide either height_cm + weight_kg OR height + weight_pounds.")]
    MissingMeasurements,
    #[error("Could not parse height. Try formats like 5ft9, 5'9, or 175cm.")]
    UnparsableHeight,
    #[error("Height or weight looks out of range. Please check your inputs.")]
    OutOfRange,
}

/// Raw options of a `set` invocation, as typed in by the user.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeasurementInput {
    pub height_cm: Option<i64>,
    pub weight_kg: Option<i64>,
    pub height: Option<String>,
    pub weight_pounds: Option<i64>,
}

/// Metric height and weight, always within the accepted ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Measurement {
    height_cm: f64,
    weight_kg: f64,
}

impl Measurement {
    pub fn new(height_cm: f64, weight_kg: f64) -> Result<Self, InputError> {
        if HEIGHT_CM_RANGE.contains(&height_cm) && WEIGHT_KG_RANGE.contains(&weight_kg) {
            Ok(Self {
                height_cm,
                weight_kg,
            })
        } else {
            Err(InputError::OutOfRange)
        }
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn height_m(&self) -> f64 {
        self.height_cm / 100.0
    }
}

impl TryFrom<&MeasurementInput> for Measurement {
    type Error = InputError;

    /// Metric options take precedence when both are given, otherwise the
    /// free-text height and pounds are converted.
    fn try_from(input: &MeasurementInput) -> Result<Self, Self::Error> {
        if let (Some(height_cm), Some(weight_kg)) = (input.height_cm, input.weight_kg) {
            return Measurement::new(height_cm as f64, weight_kg as f64);
        }

        match (input.height.as_deref(), input.weight_pounds) {
            (Some(height), Some(weight_pounds)) if !height.is_empty() => {
                let height_cm =
                    height::parse_height_to_cm(height).ok_or(InputError::UnparsableHeight)?;
                if !WEIGHT_POUNDS_RANGE.contains(&weight_pounds) {
                    return Err(InputError::OutOfRange);
                }
                Measurement::new(height_cm, pounds_to_kg(weight_pounds))
            }
            _ => Err(InputError::MissingMeasurements),
        }
    }
}

pub fn parse(input: &MeasurementInput) -> Result<Measurement, InputError> {
    Measurement::try_from(input)
}

pub fn pounds_to_kg(pounds: i64) -> f64 {
    pounds as f64 * KG_PER_POUND
}
