use std::time::Duration;

/// Dashboard configuration resolved from CLI flags and environment variables.
/// Flags win over environment variables, which win over defaults.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the relay backend (default `http://localhost:8080`).
    /// Env var: `SYNCWATCH_API_URL`. A trailing slash is trimmed.
    pub base_url: String,
    /// Prometheus endpoint shown in the footer (default
    /// `http://localhost:2112/metrics`). Env var: `SYNCWATCH_METRICS_URL`.
    pub metrics_url: String,
    /// Poll interval (default 5000ms). Env var: `SYNCWATCH_REFRESH_MS`.
    /// Zero is rejected and falls back to the default.
    pub refresh_interval: Duration,
    /// Print one snapshot report and exit instead of starting the terminal UI.
    pub once: bool,
}

impl DashboardConfig {
    pub fn resolve(
        base_url: Option<String>,
        metrics_url: Option<String>,
        interval_ms: Option<u64>,
        once: bool,
    ) -> Self {
        let base_url = base_url
            .or_else(|| std::env::var("SYNCWATCH_API_URL").ok())
            .unwrap_or_else(|| "http://localhost:8080".to_owned());
        let metrics_url = metrics_url
            .or_else(|| std::env::var("SYNCWATCH_METRICS_URL").ok())
            .unwrap_or_else(|| "http://localhost:2112/metrics".to_owned());
        let interval_ms = interval_ms
            .or_else(|| {
                std::env::var("SYNCWATCH_REFRESH_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            // Zero is not a valid poll period; treat it like an unset value.
            .filter(|ms| *ms > 0)
            .unwrap_or(5000);

        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            metrics_url,
            refresh_interval: Duration::from_millis(interval_ms),
            once,
        }
    }
}
