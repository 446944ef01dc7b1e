//! Lenient field deserializers for provider payloads.
//!
//! Providers are inconsistent about ids (string or number) and counters (number,
//! numeric string or `null`). These helpers accept every shape we have seen and map
//! anything else to `None` so normalization can fall back to a default.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// An identifier that may arrive as a string or as an integer.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A non-negative counter that may arrive as an integer or a numeric string.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
