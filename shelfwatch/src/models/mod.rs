//! Stored document types, request payloads and response shapes.

pub mod clock_in;
pub mod item;

use bson::Bson;
use serde::{Deserialize, Deserializer, Serialize};

/// Plain `{message}` acknowledgement, optionally carrying the new identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), id: None }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Renders a stored field value as an optional string.
///
/// Used for grouped results where the group key may be missing.
pub(crate) fn bson_to_string(value: Bson) -> Option<String> {
    match value {
        Bson::Null | Bson::Undefined => None,
        Bson::String(value) => Some(value),
        Bson::ObjectId(id) => Some(id.to_hex()),
        other => Some(other.to_string()),
    }
}

/// Integers that may arrive as JSON numbers or numeric strings.
pub(crate) mod lenient_int {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        String(String),
    }

    impl IntOrString {
        fn into_int<E: serde::de::Error>(self) -> Result<i64, E> {
            match self {
                IntOrString::Int(value) => Ok(value),
                IntOrString::String(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("invalid integer: {value:?}"))),
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        IntOrString::deserialize(deserializer)?.into_int()
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<IntOrString>::deserialize(deserializer)?
            .map(IntOrString::into_int)
            .transpose()
    }
}
