//! HTTP client for the relay backend API.

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;

use syncwatch_domain::id::RecordId;

use crate::domain::repository::{RelayCommandPort, RelayQueryPort};
use crate::error::DashboardError;

/// Timeout applied to every relay request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpRelayClient {
    client: Client,
    base_url: String,
}

impl HttpRelayClient {
    pub fn new(base_url: &str) -> Result<Self, DashboardError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// GET a path and decode the body as JSON. A non-2xx status and an
    /// undecodable body are distinct failures; the caller treats the former
    /// as the relay being unhealthy and the latter as a bad payload.
    async fn get_json(&self, path: &str) -> Result<Value, DashboardError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::Status {
                status: status.as_u16(),
                path: path.to_owned(),
            });
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|source| DashboardError::Payload {
            path: path.to_owned(),
            source,
        })
    }

    /// Send a mutation and require a 2xx reply. Response bodies are
    /// acknowledgements only and are discarded.
    async fn run_command(&self, method: Method, path: &str) -> Result<(), DashboardError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.request(method, &url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::Status {
                status: status.as_u16(),
                path: path.to_owned(),
            });
        }
        Ok(())
    }
}

impl RelayQueryPort for HttpRelayClient {
    async fn fetch_outbox(&self) -> Result<Value, DashboardError> {
        self.get_json("/api/outbox").await
    }

    async fn fetch_dlq(&self) -> Result<Value, DashboardError> {
        self.get_json("/api/dlq").await
    }
}

impl RelayCommandPort for HttpRelayClient {
    // The relay exposes retry as a GET.
    async fn retry(&self, id: &RecordId) -> Result<(), DashboardError> {
        self.run_command(Method::GET, &format!("/api/retry/{id}")).await
    }

    async fn add_sample(&self) -> Result<(), DashboardError> {
        self.run_command(Method::POST, "/api/add-user").await
    }

    async fn update_random(&self) -> Result<(), DashboardError> {
        self.run_command(Method::POST, "/api/update-user").await
    }
}
