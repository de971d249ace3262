//! Dead-letter queue records and their summary counters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::RecordId;
use crate::wire;

/// One normalized dead-letter entry.
///
/// Unlike the outbox, the DLQ endpoint serializes snake_case (`id`,
/// `entity_type`, `error_msg`, `resolved`); PascalCase is the fallback
/// casing here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DlqRecord {
    pub id: Option<RecordId>,
    pub entity_type: Option<String>,
    pub error_msg: Option<String>,
    pub resolved: bool,
}

impl DlqRecord {
    /// Normalize one raw element. Non-object elements become a fully absent
    /// record rather than being dropped.
    pub fn from_raw(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::absent();
        };
        Self {
            id: wire::field(obj, "id", "ID").and_then(RecordId::from_value),
            entity_type: wire::text(wire::field(obj, "entity_type", "EntityType")),
            error_msg: wire::text(wire::field(obj, "error_msg", "ErrorMsg")),
            resolved: wire::truthy(wire::field(obj, "resolved", "Resolved")),
        }
    }

    fn absent() -> Self {
        Self {
            id: None,
            entity_type: None,
            error_msg: None,
            resolved: false,
        }
    }

    /// Whether a retry may be requested for this entry. Resolved entries and
    /// entries the relay gave no identifier stay untouchable.
    pub fn can_retry(&self) -> bool {
        !self.resolved && self.id.is_some()
    }
}

/// Normalize a raw DLQ payload into records.
///
/// A payload that decoded but is not a JSON array normalizes to an empty
/// list.
pub fn normalize_dlq(payload: &Value) -> Vec<DlqRecord> {
    match payload.as_array() {
        Some(items) => items.iter().map(DlqRecord::from_raw).collect(),
        None => Vec::new(),
    }
}

/// Counters for the DLQ summary card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DlqStats {
    pub total: usize,
    pub unresolved: usize,
}

impl DlqStats {
    pub fn from_records(records: &[DlqRecord]) -> Self {
        Self {
            total: records.len(),
            unresolved: records.iter().filter(|r| !r.resolved).count(),
        }
    }
}
