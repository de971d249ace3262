//! Operator actions and the cache invalidation that follows them.

use syncwatch_domain::dlq::DlqRecord;

use crate::domain::repository::{RefreshPort, RelayCommandPort};
use crate::domain::types::ResourceKey;
use crate::error::DashboardError;

/// Actions an operator can trigger from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Retry,
    AddSample,
    UpdateRandom,
}

/// Resources whose cached snapshot an action invalidates. A retry changes
/// both the dead-letter entry and the outbox row it re-enqueues; the sample
/// writers only touch the outbox.
pub fn affected_resources(action: Action) -> &'static [ResourceKey] {
    match action {
        Action::Retry => &[ResourceKey::Dlq, ResourceKey::Outbox],
        Action::AddSample | Action::UpdateRandom => &[ResourceKey::Outbox],
    }
}

/// Outcome of a retry request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// The relay accepted the retry request.
    Requested,
    /// The entry is already resolved; no request was sent.
    SkippedResolved,
    /// The entry carries no identifier to address; no request was sent.
    SkippedMissingId,
}

/// Sends mutations to the relay and nudges the affected pollers afterwards.
/// Pollers are only nudged when the mutation succeeded; a failed request
/// leaves the cached snapshots alone.
pub struct ActionDispatcher<C: RelayCommandPort, R: RefreshPort> {
    pub api: C,
    pub refresher: R,
}

impl<C: RelayCommandPort, R: RefreshPort> ActionDispatcher<C, R> {
    pub async fn retry(&self, entry: &DlqRecord) -> Result<RetryOutcome, DashboardError> {
        if entry.resolved {
            return Ok(RetryOutcome::SkippedResolved);
        }
        let Some(id) = entry.id.as_ref() else {
            return Ok(RetryOutcome::SkippedMissingId);
        };
        self.api.retry(id).await?;
        self.invalidate(Action::Retry);
        Ok(RetryOutcome::Requested)
    }

    pub async fn add_sample(&self) -> Result<(), DashboardError> {
        self.api.add_sample().await?;
        self.invalidate(Action::AddSample);
        Ok(())
    }

    pub async fn update_random(&self) -> Result<(), DashboardError> {
        self.api.update_random().await?;
        self.invalidate(Action::UpdateRandom);
        Ok(())
    }

    fn invalidate(&self, action: Action) {
        for key in affected_resources(action) {
            self.refresher.force_refresh(*key);
        }
    }
}
