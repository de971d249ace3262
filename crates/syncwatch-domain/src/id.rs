//! Record identifiers as observed on the relay wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier attached to outbox and DLQ records.
///
/// The backend emits integer ids today, but the wire contract only promises
/// "integer or string", so both are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Read an identifier out of a raw JSON value.
    ///
    /// Anything that is neither an integer nor a string resolves to `None`
    /// (absent identifier); the record is still displayed, just without an
    /// addressable id.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => n.fmt(f),
            Self::Text(s) => s.fmt(f),
        }
    }
}
