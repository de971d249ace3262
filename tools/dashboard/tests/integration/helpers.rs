use std::sync::{Arc, Mutex};

use syncwatch_dashboard::domain::repository::{RefreshPort, RelayCommandPort};
use syncwatch_dashboard::domain::types::ResourceKey;
use syncwatch_dashboard::error::DashboardError;
use syncwatch_domain::dlq::DlqRecord;
use syncwatch_domain::id::RecordId;

// ── MockCommandPort ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayCall {
    Retry(RecordId),
    AddSample,
    UpdateRandom,
}

pub struct MockCommandPort {
    pub calls: Arc<Mutex<Vec<RelayCall>>>,
    pub fail_with_status: Option<u16>,
}

impl MockCommandPort {
    pub fn ok() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with_status: None,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with_status: Some(status),
        }
    }

    /// Returns a shared handle to the recorded calls for post-execution inspection.
    pub fn calls_handle(&self) -> Arc<Mutex<Vec<RelayCall>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: RelayCall, path: String) -> Result<(), DashboardError> {
        if let Some(status) = self.fail_with_status {
            return Err(DashboardError::Status { status, path });
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl RelayCommandPort for MockCommandPort {
    async fn retry(&self, id: &RecordId) -> Result<(), DashboardError> {
        self.record(RelayCall::Retry(id.clone()), format!("/api/retry/{id}"))
    }

    async fn add_sample(&self) -> Result<(), DashboardError> {
        self.record(RelayCall::AddSample, "/api/add-user".to_owned())
    }

    async fn update_random(&self) -> Result<(), DashboardError> {
        self.record(RelayCall::UpdateRandom, "/api/update-user".to_owned())
    }
}

// ── MockRefreshPort ──────────────────────────────────────────────────────────

pub struct MockRefreshPort {
    pub refreshed: Arc<Mutex<Vec<ResourceKey>>>,
}

impl MockRefreshPort {
    pub fn new() -> Self {
        Self {
            refreshed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a shared handle to the refreshed keys for post-execution inspection.
    pub fn refreshed_handle(&self) -> Arc<Mutex<Vec<ResourceKey>>> {
        Arc::clone(&self.refreshed)
    }
}

impl RefreshPort for MockRefreshPort {
    fn force_refresh(&self, key: ResourceKey) {
        self.refreshed.lock().unwrap().push(key);
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn open_entry(id: i64) -> DlqRecord {
    DlqRecord {
        id: Some(RecordId::Int(id)),
        entity_type: Some("user".to_owned()),
        error_msg: Some("nats: connection refused".to_owned()),
        resolved: false,
    }
}

pub fn resolved_entry(id: i64) -> DlqRecord {
    DlqRecord {
        resolved: true,
        ..open_entry(id)
    }
}

pub fn anonymous_entry() -> DlqRecord {
    DlqRecord {
        id: None,
        ..open_entry(0)
    }
}
