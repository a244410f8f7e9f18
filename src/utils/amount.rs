//! Amount decoding for request bodies
//!
//! Clients send amounts as JSON numbers or numeric strings. Anything else
//! decodes to NaN so the usual amount check reports it next to the other
//! invalid fields instead of aborting the whole body.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Null => None,
        Value::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => Some(s.trim().parse().unwrap_or(f64::NAN)),
        _ => Some(f64::NAN),
    }))
}
