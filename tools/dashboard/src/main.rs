//! Terminal dashboard for the outbox relay backend.
//!
//! # Usage
//!
//! ```bash
//! # Live dashboard against a local relay
//! cargo run -p syncwatch-dashboard -- --base-url http://localhost:8080
//!
//! # One snapshot report for scripts and cron
//! cargo run -p syncwatch-dashboard -- --once
//! ```
//!
//! Logs go to stderr so they never corrupt the terminal UI; set `RUST_LOG`
//! to adjust verbosity.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use syncwatch_dashboard::config::DashboardConfig;
use syncwatch_dashboard::infra::http::HttpRelayClient;
use syncwatch_dashboard::{report, tui};

#[derive(Parser)]
#[command(about = "Watch the outbox relay and poke its recovery endpoints")]
struct Args {
    /// Base URL of the relay backend (overrides SYNCWATCH_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Prometheus endpoint shown in the footer (overrides SYNCWATCH_METRICS_URL)
    #[arg(long)]
    metrics_url: Option<String>,

    /// Poll interval in milliseconds (overrides SYNCWATCH_REFRESH_MS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: Option<u64>,

    /// Print one snapshot report and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config =
        DashboardConfig::resolve(args.base_url, args.metrics_url, args.interval_ms, args.once);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let client = HttpRelayClient::new(&config.base_url)?;

    if config.once {
        report::run(&client, &config).await;
        return Ok(());
    }

    tui::run(Arc::new(client.clone()), client, &config).await
}
