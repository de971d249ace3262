use syncwatch_dashboard::domain::types::ResourceKey;
use syncwatch_dashboard::error::DashboardError;
use syncwatch_dashboard::usecase::actions::{ActionDispatcher, RetryOutcome};
use syncwatch_domain::id::RecordId;

use crate::helpers::{
    MockCommandPort, MockRefreshPort, RelayCall, anonymous_entry, open_entry, resolved_entry,
};

#[tokio::test]
async fn should_retry_open_entry_and_refresh_both_resources() {
    let api = MockCommandPort::ok();
    let refresher = MockRefreshPort::new();
    let calls = api.calls_handle();
    let refreshed = refresher.refreshed_handle();
    let uc = ActionDispatcher { api, refresher };

    let outcome = uc.retry(&open_entry(4)).await.unwrap();

    assert_eq!(outcome, RetryOutcome::Requested);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![RelayCall::Retry(RecordId::Int(4))]
    );
    assert_eq!(
        *refreshed.lock().unwrap(),
        vec![ResourceKey::Dlq, ResourceKey::Outbox],
        "expected a successful retry to invalidate both resources"
    );
}

#[tokio::test]
async fn should_skip_resolved_entry_without_any_request() {
    let api = MockCommandPort::ok();
    let refresher = MockRefreshPort::new();
    let calls = api.calls_handle();
    let refreshed = refresher.refreshed_handle();
    let uc = ActionDispatcher { api, refresher };

    let outcome = uc.retry(&resolved_entry(4)).await.unwrap();

    assert_eq!(outcome, RetryOutcome::SkippedResolved);
    assert!(calls.lock().unwrap().is_empty());
    assert!(refreshed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_skip_entry_without_identifier() {
    let api = MockCommandPort::ok();
    let refresher = MockRefreshPort::new();
    let calls = api.calls_handle();
    let refreshed = refresher.refreshed_handle();
    let uc = ActionDispatcher { api, refresher };

    let outcome = uc.retry(&anonymous_entry()).await.unwrap();

    assert_eq!(outcome, RetryOutcome::SkippedMissingId);
    assert!(calls.lock().unwrap().is_empty());
    assert!(refreshed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_not_refresh_when_retry_fails() {
    let api = MockCommandPort::failing(500);
    let refresher = MockRefreshPort::new();
    let refreshed = refresher.refreshed_handle();
    let uc = ActionDispatcher { api, refresher };

    let result = uc.retry(&open_entry(4)).await;

    assert!(matches!(
        result,
        Err(DashboardError::Status { status: 500, .. })
    ));
    assert!(refreshed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_refresh_outbox_after_add_sample() {
    let api = MockCommandPort::ok();
    let refresher = MockRefreshPort::new();
    let calls = api.calls_handle();
    let refreshed = refresher.refreshed_handle();
    let uc = ActionDispatcher { api, refresher };

    uc.add_sample().await.unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![RelayCall::AddSample]);
    assert_eq!(*refreshed.lock().unwrap(), vec![ResourceKey::Outbox]);
}

#[tokio::test]
async fn should_refresh_outbox_after_update_random() {
    let api = MockCommandPort::ok();
    let refresher = MockRefreshPort::new();
    let calls = api.calls_handle();
    let refreshed = refresher.refreshed_handle();
    let uc = ActionDispatcher { api, refresher };

    uc.update_random().await.unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![RelayCall::UpdateRandom]);
    assert_eq!(*refreshed.lock().unwrap(), vec![ResourceKey::Outbox]);
}

#[tokio::test]
async fn should_not_refresh_when_sample_write_fails() {
    let api = MockCommandPort::failing(503);
    let refresher = MockRefreshPort::new();
    let refreshed = refresher.refreshed_handle();
    let uc = ActionDispatcher { api, refresher };

    let result = uc.add_sample().await;

    assert!(matches!(
        result,
        Err(DashboardError::Status { status: 503, .. })
    ));
    assert!(refreshed.lock().unwrap().is_empty());
}
