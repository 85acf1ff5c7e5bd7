//! Custom serde deserializers for flexible type handling
//!
//! The live API is inconsistent about numeric identifiers: the same `id`
//! field is a JSON number on one endpoint and a decimal string on another.

use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum FlexibleId {
    Int(u64),
    String(String),
}

/// Deserialize an identifier that can be:
/// - JSON number: `235`
/// - String: `"235"` (surrounding whitespace ignored)
///
/// Negative numbers, fractions and non-numeric strings are rejected.
pub fn deserialize_flexible_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match FlexibleId::deserialize(deserializer)? {
        FlexibleId::Int(id) => Ok(id),
        FlexibleId::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid numeric id: {}", s))),
    }
}

/// Optional variant of [`deserialize_flexible_id`]; `null` and `""` map to `None`
pub fn deserialize_flexible_opt_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<FlexibleId> = Option::deserialize(deserializer)?;

    match value {
        None => Ok(None),
        Some(FlexibleId::Int(id)) => Ok(Some(id)),
        Some(FlexibleId::String(s)) if s.trim().is_empty() => Ok(None),
        Some(FlexibleId::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid numeric id: {}", s))),
    }
}
