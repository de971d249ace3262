#![allow(async_fn_in_trait)]

use std::future::Future;

use serde_json::Value;

use syncwatch_domain::id::RecordId;

use crate::domain::types::ResourceKey;
use crate::error::DashboardError;

/// Port for reading relay resources. Payloads stay raw JSON here;
/// normalization happens in `syncwatch_domain`.
///
/// The returned futures must be `Send`: each poller drives them from a
/// spawned task. Implementations still write plain `async fn`.
pub trait RelayQueryPort: Send + Sync {
    fn fetch_outbox(&self) -> impl Future<Output = Result<Value, DashboardError>> + Send;
    fn fetch_dlq(&self) -> impl Future<Output = Result<Value, DashboardError>> + Send;
}

/// Port for relay mutations.
pub trait RelayCommandPort: Send + Sync {
    /// Ask the relay to retry one dead-letter entry.
    async fn retry(&self, id: &RecordId) -> Result<(), DashboardError>;
    /// Insert a synthetic sample row to exercise the pipeline.
    async fn add_sample(&self) -> Result<(), DashboardError>;
    /// Mutate a random existing row to exercise the pipeline.
    async fn update_random(&self) -> Result<(), DashboardError>;
}

/// Port for nudging pollers whose cached state an action invalidated.
pub trait RefreshPort: Send + Sync {
    fn force_refresh(&self, key: ResourceKey);
}
