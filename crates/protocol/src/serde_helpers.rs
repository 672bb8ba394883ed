//! Lenient decoders for fields Graph and API clients send in more than one shape.

use serde::de;
use serde::{Deserialize, Deserializer, Serializer};

use crate::ProtocolError;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

/// Parses a decimal byte offset as Graph writes it (`"1048576"`).
pub fn parse_offset(raw: &str) -> Result<u64, ProtocolError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ProtocolError::InvalidOffset(raw.to_string()))
}

/// Byte offsets: encoded as decimal strings, decoded from strings or numbers.
pub mod offset {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => parse_offset(&s).map_err(de::Error::custom),
            StringOrNumber::Number(n) => Ok(n),
        }
    }
}

/// Decodes an identifier that may arrive as a JSON string, number, or null.
///
/// `null` decodes to an empty string so that request validation, not the
/// JSON layer, reports the missing value.
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::String(s)) => s,
        Some(StringOrNumber::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
