pub mod bmi;
pub mod height;
pub mod measurement;
pub mod record;
