use std::fmt;

use chrono::{DateTime, Utc};

/// Placeholder shown for fields the relay did not provide.
pub const ABSENT_FIELD: &str = "—";

/// Rows shown per table. The relay already caps payloads at 100 records;
/// the TUI and the one-shot report show the newest slice of that.
pub const TABLE_ROWS: usize = 10;

/// The two relay resources the dashboard polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Outbox,
    Dlq,
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outbox => f.write_str("outbox"),
            Self::Dlq => f.write_str("dlq"),
        }
    }
}

/// Latest known state of one polled resource.
///
/// `rows` always holds the most recent successful fetch; a failed fetch only
/// sets `last_error` and leaves the rows in place.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub rows: Vec<T>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl<T> Snapshot<T> {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            fetched_at: None,
            last_error: None,
        }
    }

    /// At least one fetch has succeeded since startup.
    pub fn has_data(&self) -> bool {
        self.fetched_at.is_some()
    }

    /// The most recent fetch failed; `rows` may be out of date.
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some()
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::empty()
    }
}
