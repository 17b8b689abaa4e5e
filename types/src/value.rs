//! Scalar values held by the configuration store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single configuration entry value.
///
/// Booleans and strings are the editable kinds. Anything else found in the
/// file (numbers, null, arrays, nested objects) is kept verbatim in `Other`
/// so a save never drops data the editor cannot represent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Text(String),
    Other(serde_json::Value),
}

impl ConfigValue {
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// JSON type name, used when rendering unsupported entries.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Text(_) => "string",
            Self::Other(serde_json::Value::Null) => "null",
            Self::Other(serde_json::Value::Number(_)) => "number",
            Self::Other(serde_json::Value::Array(_)) => "array",
            Self::Other(serde_json::Value::Object(_)) => "object",
            // Untagged deserialization routes these to the typed variants,
            // but an `Other` can still be built by hand.
            Self::Other(serde_json::Value::Bool(_)) => "boolean",
            Self::Other(serde_json::Value::String(_)) => "string",
        }
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Bool(_) | Self::Text(_))
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::String(value) => Self::Text(value),
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}
