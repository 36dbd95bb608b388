//! Lenient field deserializers for upstream feature attributes.
//!
//! Feature services export attributes with inconsistent types (numbers as
//! strings, integral ids as floats, empty strings for missing values). A
//! malformed attribute on one cell must not reject the whole dataset, so
//! these helpers map anything unusable to `None` instead of failing.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

/// Deserializes an optional measurement.
///
/// Accepts numbers and numeric strings. Anything else, including `NaN`
/// spellings, becomes `None`.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Deserializes an optional key that may be a string or a number.
///
/// Blank strings become `None`; integral floats are printed without a
/// fractional part so `3.0` and `3` refer to the same key.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails.
pub fn optional_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(key_from_value))
}

/// Deserializes a required key that may be a string or a number.
///
/// # Errors
///
/// Returns an error if the value is missing, blank, or not a scalar.
pub fn required_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    key_from_value(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a non-empty key, got {value}")))
}

/// Deserializes an integer identifier that may arrive as an integral float
/// or a numeric string.
///
/// # Errors
///
/// Returns an error if the value is not an integral number.
pub fn integer_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(id) = value.as_i64() {
        return Ok(id);
    }
    number_from_value(&value)
        .filter(|n| n.fract() == 0.0 && n.abs() < 9.0e15)
        .map(|n| {
            #[allow(clippy::cast_possible_truncation)]
            let id = n as i64;
            id
        })
        .ok_or_else(|| D::Error::custom(format!("expected an integer id, got {value}")))
}

fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn key_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => n.as_i64().map_or_else(
            || {
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 && f.abs() < 9.0e15 {
                        #[allow(clippy::cast_possible_truncation)]
                        let whole = f as i64;
                        whole.to_string()
                    } else {
                        f.to_string()
                    }
                })
            },
            |i| Some(i.to_string()),
        ),
        _ => None,
    }
}
