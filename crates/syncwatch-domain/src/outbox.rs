//! Outbox event records and their summary counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::RecordId;
use crate::wire;

/// One normalized outbox event.
///
/// The relay serializes these PascalCase (`ID`, `EntityType`, `Op`,
/// `Processed`, `CreatedAt`); older relay builds emitted snake_case. Either
/// casing normalizes to the same record, with PascalCase winning when a
/// record carries both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxRecord {
    pub id: Option<RecordId>,
    pub entity_type: Option<String>,
    pub op: Option<String>,
    pub processed: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl OutboxRecord {
    /// Normalize one raw element. Non-object elements become a fully absent
    /// record rather than being dropped, so row counts stay honest.
    pub fn from_raw(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::absent();
        };
        Self {
            id: wire::field(obj, "ID", "id").and_then(RecordId::from_value),
            entity_type: wire::text(wire::field(obj, "EntityType", "entity_type")),
            op: wire::text(wire::field(obj, "Op", "op")),
            processed: wire::truthy(wire::field(obj, "Processed", "processed")),
            created_at: wire::timestamp(wire::field(obj, "CreatedAt", "created_at")),
        }
    }

    fn absent() -> Self {
        Self {
            id: None,
            entity_type: None,
            op: None,
            processed: false,
            created_at: None,
        }
    }
}

/// Normalize a raw outbox payload into records.
///
/// A payload that decoded but is not a JSON array (object, scalar, `null`)
/// normalizes to an empty list.
pub fn normalize_outbox(payload: &Value) -> Vec<OutboxRecord> {
    match payload.as_array() {
        Some(items) => items.iter().map(OutboxRecord::from_raw).collect(),
        None => Vec::new(),
    }
}

/// Counters for the outbox summary cards, recomputed from a full record
/// slice on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutboxStats {
    pub total: usize,
    pub processed: usize,
    pub pending: usize,
}

impl OutboxStats {
    pub fn from_records(records: &[OutboxRecord]) -> Self {
        let processed = records.iter().filter(|r| r.processed).count();
        Self {
            total: records.len(),
            processed,
            pending: records.len() - processed,
        }
    }
}
