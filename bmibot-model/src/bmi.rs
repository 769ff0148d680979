//! BMI arithmetic and display helpers. Inputs are expected to be validated
//! already, none of these functions fail.

pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let meters = height_cm / 100.0;
    weight_kg / (meters * meters)
}

/// One fractional digit, halves rounded away from zero (`24.25` -> `"24.3"`).
pub fn format_bmi(bmi: f64) -> String {
    format!("{:.1}", round_to_tenths(bmi))
}

pub fn format_height_cm(cm: f64) -> String {
    format!("{} cm", cm.round() as i64)
}

pub fn format_weight_kg(kg: f64) -> String {
    format!("{} kg", round_to_tenths(kg))
}

fn round_to_tenths(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
