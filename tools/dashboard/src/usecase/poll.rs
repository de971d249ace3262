//! Background polling of relay resources.
//!
//! Each resource gets its own task that fetches on a fixed period and
//! publishes the full normalized result through a watch channel. Snapshots
//! are replaced wholesale on success; a failed fetch only marks the current
//! snapshot stale. Fetches for one resource run strictly one at a time, so
//! a newer result can never be overwritten by an older one.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use syncwatch_domain::dlq::{DlqRecord, normalize_dlq};
use syncwatch_domain::outbox::{OutboxRecord, normalize_outbox};

use crate::domain::repository::{RefreshPort, RelayQueryPort};
use crate::domain::types::{ResourceKey, Snapshot};
use crate::error::DashboardError;

/// Handle to one polling task. Dropping it stops the task.
pub struct Subscription<T> {
    rx: watch::Receiver<Snapshot<T>>,
    refresh_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl<T: Clone> Subscription<T> {
    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.rx.borrow().clone()
    }
}

impl<T> Subscription<T> {
    /// Request an immediate fetch. The periodic phase is not reset; the next
    /// scheduled tick still happens on time. A full buffer already holds a
    /// pending refresh, so the signal is dropped.
    pub fn force_refresh(&self) {
        let _ = self.refresh_tx.try_send(());
    }

    fn refresh_handle(&self) -> mpsc::Sender<()> {
        self.refresh_tx.clone()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn the polling loop for one resource. The first fetch happens
/// immediately; later fetches follow the period or a forced refresh.
fn subscribe<Q, T>(
    api: Arc<Q>,
    key: ResourceKey,
    period: Duration,
    normalize: fn(&Value) -> Vec<T>,
) -> Subscription<T>
where
    Q: RelayQueryPort + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    let (tx, rx) = watch::channel(Snapshot::empty());
    let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                Some(()) = refresh_rx.recv() => {}
            }
            match fetch_raw(api.as_ref(), key).await {
                Ok(payload) => {
                    let rows = normalize(&payload);
                    tracing::debug!(resource = %key, rows = rows.len(), "snapshot refreshed");
                    tx.send_replace(Snapshot {
                        rows,
                        fetched_at: Some(Utc::now()),
                        last_error: None,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        kind = e.kind(),
                        resource = %key,
                        "poll failed, keeping last snapshot"
                    );
                    tx.send_modify(|s| s.last_error = Some(e.to_string()));
                }
            }
        }
    });

    Subscription {
        rx,
        refresh_tx,
        task,
    }
}

async fn fetch_raw<Q: RelayQueryPort>(api: &Q, key: ResourceKey) -> Result<Value, DashboardError> {
    match key {
        ResourceKey::Outbox => api.fetch_outbox().await,
        ResourceKey::Dlq => api.fetch_dlq().await,
    }
}

/// The dashboard's two pollers, started together and stopped together.
pub struct Pollers {
    pub outbox: Subscription<OutboxRecord>,
    pub dlq: Subscription<DlqRecord>,
}

impl Pollers {
    pub fn start<Q>(api: Arc<Q>, period: Duration) -> Self
    where
        Q: RelayQueryPort + Send + Sync + 'static,
    {
        Self {
            outbox: subscribe(Arc::clone(&api), ResourceKey::Outbox, period, normalize_outbox),
            dlq: subscribe(api, ResourceKey::Dlq, period, normalize_dlq),
        }
    }

    pub fn refresh(&self, keys: &[ResourceKey]) {
        for key in keys {
            match key {
                ResourceKey::Outbox => self.outbox.force_refresh(),
                ResourceKey::Dlq => self.dlq.force_refresh(),
            }
        }
    }

    /// Clonable refresh handle for wiring into the action dispatcher.
    pub fn refresher(&self) -> PollerRefresher {
        PollerRefresher {
            outbox: self.outbox.refresh_handle(),
            dlq: self.dlq.refresh_handle(),
        }
    }
}

/// Sends refresh signals to the pollers without holding them.
#[derive(Clone)]
pub struct PollerRefresher {
    outbox: mpsc::Sender<()>,
    dlq: mpsc::Sender<()>,
}

impl RefreshPort for PollerRefresher {
    fn force_refresh(&self, key: ResourceKey) {
        let tx = match key {
            ResourceKey::Outbox => &self.outbox,
            ResourceKey::Dlq => &self.dlq,
        };
        let _ = tx.try_send(());
    }
}
