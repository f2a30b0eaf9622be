//! Tolerant field readers for files written by other agents.
//!
//! Upstream agents are not consistent about JSON types: ids and timestamps
//! arrive as numbers, and `logs` is sometimes `null`. These readers coerce
//! scalars to strings instead of rejecting the whole file.

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer, Error};
use serde_json::Value;

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// An optional string field that also accepts numbers and booleans.
/// Null, arrays and objects read as absent.
pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

/// A required string field that also accepts numbers and booleans.
pub(crate) fn required_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let kind = match &value {
        Value::Null => "null",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
        _ => "",
    };
    scalar_to_string(value)
        .ok_or_else(|| D::Error::custom(format!("expected a string, found {}", kind)))
}

/// A list that reads `null` or any non-array value as empty.
pub(crate) fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => serde_json::from_value(Value::Array(items)).map_err(D::Error::custom),
        _ => Ok(Vec::new()),
    }
}
