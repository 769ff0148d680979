//! Command surface registered with the chat platform.

use bmibot_model::measurement::{HEIGHT_CM_RANGE, WEIGHT_KG_RANGE, WEIGHT_POUNDS_RANGE};
use serde_json::{json, Value};

pub const COMMAND_NAME: &str = "bmi";

// Discord application command option types.
const SUB_COMMAND: u8 = 1;
const STRING: u8 = 3;
const INTEGER: u8 = 4;
const USER: u8 = 6;

/// The list of application commands, ready to be uploaded as-is.
pub fn definition() -> Value {
    json!([
        {
            "name": COMMAND_NAME,
            "description": "Set, show, or announce BMI",
            "dm_permission": false,
            "options": [
                {
                    "name": "set",
                    "description": "Save your BMI data",
                    "type": SUB_COMMAND,
                    "options": [
                        integer_option(
                            "height_cm",
                            "Height in centimeters",
                            *HEIGHT_CM_RANGE.start() as i64,
                            *HEIGHT_CM_RANGE.end() as i64,
                        ),
                        integer_option(
                            "weight_kg",
                            "Weight in kilograms",
                            *WEIGHT_KG_RANGE.start() as i64,
                            *WEIGHT_KG_RANGE.end() as i64,
                        ),
                        {
                            "name": "height",
                            "description": "Height like 5ft9 or 5'9",
                            "type": STRING,
                            "required": false,
                        },
                        integer_option(
                            "weight_pounds",
                            "Weight in pounds",
                            *WEIGHT_POUNDS_RANGE.start(),
                            *WEIGHT_POUNDS_RANGE.end(),
                        ),
                    ],
                },
                {
                    "name": "show",
                    "description": "Show BMI for yourself or another user",
                    "type": SUB_COMMAND,
                    "options": [
                        {
                            "name": "user",
                            "description": "User to check",
                            "type": USER,
                            "required": false,
                        },
                    ],
                },
                {
                    "name": "announce",
                    "description": "Announce your BMI publicly",
                    "type": SUB_COMMAND,
                },
            ],
        },
    ])
}

fn integer_option(name: &str, description: &str, min: i64, max: i64) -> Value {
    json!({
        "name": name,
        "description": description,
        "type": INTEGER,
        "required": false,
        "min_value": min,
        "max_value": max,
    })
}
