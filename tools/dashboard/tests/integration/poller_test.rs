use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use syncwatch_dashboard::domain::types::{ResourceKey, Snapshot};
use syncwatch_dashboard::infra::http::HttpRelayClient;
use syncwatch_dashboard::usecase::poll::{Pollers, Subscription};
use syncwatch_testing::StubRelay;

const WAIT: Duration = Duration::from_secs(5);

async fn wait_until<T, F>(sub: &Subscription<T>, mut predicate: F) -> Snapshot<T>
where
    T: Clone,
    F: FnMut(&Snapshot<T>) -> bool,
{
    let deadline = Instant::now() + WAIT;
    loop {
        let snapshot = sub.snapshot();
        if predicate(&snapshot) {
            return snapshot;
        }
        if Instant::now() > deadline {
            panic!("snapshot never matched within {WAIT:?}");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

fn pollers_against(relay: &StubRelay, period_ms: u64) -> Pollers {
    let client = HttpRelayClient::new(relay.base_url()).unwrap();
    Pollers::start(Arc::new(client), Duration::from_millis(period_ms))
}

async fn wait_for_outbox_hits(relay: &StubRelay, hits: usize) {
    let deadline = Instant::now() + WAIT;
    while relay.outbox_hits() < hits {
        if Instant::now() > deadline {
            panic!("relay never saw {hits} outbox fetches within {WAIT:?}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn should_publish_rows_fetched_from_the_relay() {
    let relay = StubRelay::start().await;
    relay.set_outbox(json!([
        {"ID": 1, "EntityType": "user", "Op": "insert", "Processed": true},
        {"id": 2, "entity_type": "user", "op": "update", "processed": false},
    ]));
    relay.set_dlq(json!([
        {"id": 9, "entity_type": "user", "error_msg": "nats timeout", "resolved": false},
    ]));
    let pollers = pollers_against(&relay, 50);

    let outbox = wait_until(&pollers.outbox, |s| s.rows.len() == 2).await;
    let dlq = wait_until(&pollers.dlq, |s| s.rows.len() == 1).await;

    assert!(outbox.rows[0].processed);
    assert!(!outbox.rows[1].processed);
    assert_eq!(outbox.rows[1].op.as_deref(), Some("update"));
    assert!(!dlq.rows[0].resolved);
    assert!(!outbox.is_stale());
    assert!(outbox.has_data());
}

#[tokio::test]
async fn should_keep_stale_rows_while_relay_is_down_and_recover() {
    let relay = StubRelay::start().await;
    relay.set_outbox(json!([{"ID": 1, "Processed": false}]));
    let pollers = pollers_against(&relay, 50);
    wait_until(&pollers.outbox, |s| s.rows.len() == 1).await;

    relay.fail_reads(500);
    let stale = wait_until(&pollers.outbox, |s| s.is_stale()).await;
    assert_eq!(stale.rows.len(), 1);
    assert!(stale.last_error.as_deref().unwrap_or("").contains("500"));

    relay.set_outbox(json!([
        {"ID": 1, "Processed": true},
        {"ID": 2, "Processed": false},
    ]));
    let fresh = wait_until(&pollers.outbox, |s| s.rows.len() == 2).await;
    assert!(!fresh.is_stale());
}

#[tokio::test]
async fn should_treat_undecodable_payload_as_error_not_empty() {
    let relay = StubRelay::start().await;
    relay.set_outbox(json!([{"ID": 1, "Processed": false}]));
    let pollers = pollers_against(&relay, 50);
    wait_until(&pollers.outbox, |s| s.rows.len() == 1).await;

    relay.set_outbox_raw("<html>502 Bad Gateway</html>");
    let stale = wait_until(&pollers.outbox, |s| s.is_stale()).await;

    assert_eq!(stale.rows.len(), 1);
}

#[tokio::test]
async fn should_replace_rows_when_relay_returns_object_payload() {
    let relay = StubRelay::start().await;
    relay.set_outbox(json!([{"ID": 1, "Processed": false}]));
    let pollers = pollers_against(&relay, 50);
    wait_until(&pollers.outbox, |s| s.rows.len() == 1).await;

    relay.set_outbox(json!({"error": "maintenance"}));
    let snapshot = wait_until(&pollers.outbox, |s| s.rows.is_empty()).await;

    assert!(!snapshot.is_stale());
    assert!(snapshot.has_data());
}

#[tokio::test]
async fn should_force_refresh_immediately_with_long_interval() {
    let relay = StubRelay::start().await;
    relay.set_outbox(json!([{"ID": 1, "Processed": false}]));
    let pollers = pollers_against(&relay, 60_000);
    wait_until(&pollers.outbox, |s| s.has_data()).await;

    relay.set_outbox(json!([
        {"ID": 1, "Processed": true},
        {"ID": 2, "Processed": false},
    ]));
    pollers.refresh(&[ResourceKey::Outbox]);

    let fresh = wait_until(&pollers.outbox, |s| s.rows.len() == 2).await;
    assert!(!fresh.is_stale());
}

#[tokio::test]
async fn should_keep_the_scheduled_phase_after_a_forced_refresh() {
    let relay = StubRelay::start().await;
    relay.set_outbox(json!([]));
    let pollers = pollers_against(&relay, 800);
    wait_for_outbox_hits(&relay, 1).await;

    tokio::time::sleep(Duration::from_millis(250)).await;
    pollers.refresh(&[ResourceKey::Outbox]);
    wait_for_outbox_hits(&relay, 2).await;

    // The next scheduled fetch still lands at the original 800ms offset. A
    // schedule restarted by the forced refresh would not fetch until 1050ms.
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(
        relay.outbox_hits(),
        3,
        "expected exactly the initial fetch, the forced one, and the kept tick"
    );
}

#[tokio::test]
async fn should_stop_hitting_the_relay_after_drop() {
    let relay = StubRelay::start().await;
    relay.set_outbox(json!([]));
    let pollers = pollers_against(&relay, 20);
    wait_until(&pollers.outbox, |s| s.has_data()).await;

    drop(pollers);
    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = relay.outbox_hits();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(relay.outbox_hits(), settled);
}
