//! Lenient weight parsing for report submissions.
//!
//! Mobile clients send weights as numbers, numeric strings, empty strings or
//! not at all. Anything that is not a number becomes 0. Negative and
//! non-finite values survive parsing so validation can reject them with 400.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::error::AppError;

pub fn deserialize_weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(weight_from_value).unwrap_or(0.0))
}

fn weight_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn check_weight(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::Validation(format!(
            "{} must be a finite number",
            field
        )));
    }
    if value < 0.0 {
        return Err(AppError::Validation(format!("{} must not be negative", field)));
    }
    Ok(())
}
