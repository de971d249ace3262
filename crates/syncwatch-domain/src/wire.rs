//! Field resolution over loosely-typed wire records.
//!
//! The relay emits records whose key casing drifts between PascalCase and
//! snake_case depending on which backend component serialized them. Every
//! accessor here resolves one field with an explicit fallback order and
//! degrades to an absent sentinel instead of failing, so a half-shaped
//! record still renders.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Resolve a field that may appear under either of two key casings.
///
/// A key that is present but JSON `null` counts as absent and falls through
/// to the alternate.
pub fn field<'a>(
    record: &'a Map<String, Value>,
    primary: &str,
    alternate: &str,
) -> Option<&'a Value> {
    non_null(record.get(primary)).or_else(|| non_null(record.get(alternate)))
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Boolean resolution with loose truthiness, since flags occasionally arrive
/// as numbers or strings. Absent resolves to `false`.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// String resolution: strings pass through, stray scalars are stringified,
/// composites resolve to absent.
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Timestamp resolution: RFC 3339 strings only; anything else is absent.
pub fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}
