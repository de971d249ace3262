//! Scriptable stub of the relay backend HTTP API.
//!
//! Serves the same five endpoints as the real relay on an ephemeral local
//! port. Tests script each endpoint's next response through `RelayScript`
//! and inspect hit counters afterwards. The server task is aborted when
//! the stub is dropped.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// One scripted reply for a read endpoint.
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// 200 with the given JSON body.
    Json(Value),
    /// 200 with the given body bytes verbatim. Lets tests serve payloads
    /// that are not valid JSON.
    Raw(String),
    /// The given status with an empty body.
    Status(u16),
}

impl IntoResponse for StubResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Json(body) => Json(body).into_response(),
            Self::Raw(body) => body.into_response(),
            Self::Status(code) => status(code).into_response(),
        }
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Shared scripting surface. Read endpoints replay their scripted response
/// on every hit; action endpoints succeed unless a failure status is set.
pub struct RelayScript {
    pub outbox: Mutex<StubResponse>,
    pub dlq: Mutex<StubResponse>,
    pub retry_failure: Mutex<Option<u16>>,
    pub action_failure: Mutex<Option<u16>>,
    pub outbox_hits: AtomicUsize,
    pub dlq_hits: AtomicUsize,
    pub retried: Mutex<Vec<String>>,
    pub add_hits: AtomicUsize,
    pub update_hits: AtomicUsize,
    next_id: AtomicI64,
}

impl RelayScript {
    fn new() -> Self {
        Self {
            outbox: Mutex::new(StubResponse::Json(json!([]))),
            dlq: Mutex::new(StubResponse::Json(json!([]))),
            retry_failure: Mutex::new(None),
            action_failure: Mutex::new(None),
            outbox_hits: AtomicUsize::new(0),
            dlq_hits: AtomicUsize::new(0),
            retried: Mutex::new(Vec::new()),
            add_hits: AtomicUsize::new(0),
            update_hits: AtomicUsize::new(0),
            next_id: AtomicI64::new(1),
        }
    }
}

/// In-process relay stub bound to an ephemeral local port.
pub struct StubRelay {
    base_url: String,
    script: Arc<RelayScript>,
    server: JoinHandle<()>,
}

impl StubRelay {
    /// Bind and serve on `127.0.0.1:0`.
    pub async fn start() -> Self {
        let script = Arc::new(RelayScript::new());
        let router = Router::new()
            .route("/api/outbox", get(get_outbox))
            .route("/api/dlq", get(get_dlq))
            .route("/api/retry/{id}", get(get_retry))
            .route("/api/add-user", post(post_add_user))
            .route("/api/update-user", post(post_update_user))
            .with_state(Arc::clone(&script));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub relay");
        let addr = listener.local_addr().expect("stub relay has no address");
        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub relay error");
        });

        Self {
            base_url: format!("http://{addr}"),
            script,
            server,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn script(&self) -> &RelayScript {
        &self.script
    }

    pub fn set_outbox(&self, body: Value) {
        *self.script.outbox.lock().unwrap() = StubResponse::Json(body);
    }

    pub fn set_dlq(&self, body: Value) {
        *self.script.dlq.lock().unwrap() = StubResponse::Json(body);
    }

    /// Serve the given bytes verbatim on the outbox endpoint.
    pub fn set_outbox_raw(&self, body: &str) {
        *self.script.outbox.lock().unwrap() = StubResponse::Raw(body.to_owned());
    }

    /// Script both read endpoints to fail with the given status.
    pub fn fail_reads(&self, code: u16) {
        *self.script.outbox.lock().unwrap() = StubResponse::Status(code);
        *self.script.dlq.lock().unwrap() = StubResponse::Status(code);
    }

    /// Script the retry endpoint to fail with the given status.
    pub fn fail_retry(&self, code: u16) {
        *self.script.retry_failure.lock().unwrap() = Some(code);
    }

    /// Script the sample-writer endpoints to fail with the given status.
    pub fn fail_actions(&self, code: u16) {
        *self.script.action_failure.lock().unwrap() = Some(code);
    }

    pub fn outbox_hits(&self) -> usize {
        self.script.outbox_hits.load(Ordering::SeqCst)
    }

    pub fn dlq_hits(&self) -> usize {
        self.script.dlq_hits.load(Ordering::SeqCst)
    }

    /// Identifiers received on the retry endpoint, in arrival order.
    pub fn retried_ids(&self) -> Vec<String> {
        self.script.retried.lock().unwrap().clone()
    }

    pub fn add_hits(&self) -> usize {
        self.script.add_hits.load(Ordering::SeqCst)
    }

    pub fn update_hits(&self) -> usize {
        self.script.update_hits.load(Ordering::SeqCst)
    }
}

impl Drop for StubRelay {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn get_outbox(State(script): State<Arc<RelayScript>>) -> StubResponse {
    script.outbox_hits.fetch_add(1, Ordering::SeqCst);
    script.outbox.lock().unwrap().clone()
}

async fn get_dlq(State(script): State<Arc<RelayScript>>) -> StubResponse {
    script.dlq_hits.fetch_add(1, Ordering::SeqCst);
    script.dlq.lock().unwrap().clone()
}

async fn get_retry(State(script): State<Arc<RelayScript>>, Path(id): Path<String>) -> Response {
    if let Some(code) = *script.retry_failure.lock().unwrap() {
        return (status(code), Json(json!({"error": "dlq item not found"}))).into_response();
    }
    script.retried.lock().unwrap().push(id);
    Json(json!({"status": "retried"})).into_response()
}

async fn post_add_user(State(script): State<Arc<RelayScript>>) -> Response {
    if let Some(code) = *script.action_failure.lock().unwrap() {
        return status(code).into_response();
    }
    script.add_hits.fetch_add(1, Ordering::SeqCst);
    let id = script.next_id.fetch_add(1, Ordering::SeqCst);
    Json(json!({"status": "created", "id": id})).into_response()
}

async fn post_update_user(State(script): State<Arc<RelayScript>>) -> Response {
    if let Some(code) = *script.action_failure.lock().unwrap() {
        return status(code).into_response();
    }
    script.update_hits.fetch_add(1, Ordering::SeqCst);
    let id = script.next_id.load(Ordering::SeqCst).max(1);
    Json(json!({"status": "updated", "id": id})).into_response()
}
