//! One-shot snapshot report for scripts and terminals without a TTY.

use chrono::Local;
use serde_json::Value;

use syncwatch_domain::dlq::{DlqRecord, DlqStats, normalize_dlq};
use syncwatch_domain::outbox::{OutboxRecord, OutboxStats, normalize_outbox};

use crate::config::DashboardConfig;
use crate::domain::repository::RelayQueryPort;
use crate::domain::types::{ABSENT_FIELD, TABLE_ROWS};
use crate::error::DashboardError;

/// Fetch both resources once and print a plain-text snapshot. A failed fetch
/// is reported inline and does not change the exit code; the report is
/// observational, not an assertion.
pub async fn run<Q: RelayQueryPort>(api: &Q, config: &DashboardConfig) {
    for line in build(api, config).await {
        println!("{line}");
    }
}

/// Assemble the report as lines: summary counters followed by the first rows
/// of both tables, derived the same way the terminal UI derives them.
async fn build<Q: RelayQueryPort>(api: &Q, config: &DashboardConfig) -> Vec<String> {
    let mut lines = vec![format!("Relay: {}", config.base_url)];
    push_outbox(&mut lines, api.fetch_outbox().await);
    push_dlq(&mut lines, api.fetch_dlq().await);
    lines.push(format!("Metrics: {}", config.metrics_url));
    lines
}

fn push_outbox(lines: &mut Vec<String>, fetched: Result<Value, DashboardError>) {
    match fetched {
        Ok(payload) => {
            let rows = normalize_outbox(&payload);
            let stats = OutboxStats::from_records(&rows);
            lines.push(format!(
                "Outbox: {} events ({} processed, {} pending)",
                stats.total, stats.processed, stats.pending
            ));
            lines.extend(rows.iter().take(TABLE_ROWS).map(outbox_line));
        }
        Err(e) => lines.push(format!("Outbox: unavailable ({e})")),
    }
}

fn push_dlq(lines: &mut Vec<String>, fetched: Result<Value, DashboardError>) {
    match fetched {
        Ok(payload) => {
            let rows = normalize_dlq(&payload);
            let stats = DlqStats::from_records(&rows);
            lines.push(format!(
                "DLQ: {} entries ({} unresolved)",
                stats.total, stats.unresolved
            ));
            lines.extend(rows.iter().take(TABLE_ROWS).map(dlq_line));
        }
        Err(e) => lines.push(format!("DLQ: unavailable ({e})")),
    }
}

fn outbox_line(record: &OutboxRecord) -> String {
    let id = record
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| ABSENT_FIELD.to_owned());
    let entity = record.entity_type.as_deref().unwrap_or(ABSENT_FIELD);
    let op = record.op.as_deref().unwrap_or(ABSENT_FIELD);
    let status = if record.processed { "Processed" } else { "Pending" };
    let created = record
        .created_at
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ABSENT_FIELD.to_owned());
    format!("  {id:<8} {entity:<14} {op:<10} {status:<10} {created}")
}

// Unlike the TUI table, the error column is padded, never clipped.
fn dlq_line(record: &DlqRecord) -> String {
    let id = record
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| ABSENT_FIELD.to_owned());
    let entity = record.entity_type.as_deref().unwrap_or(ABSENT_FIELD);
    let error = record.error_msg.as_deref().unwrap_or(ABSENT_FIELD);
    let status = if record.resolved { "Resolved" } else { "Open" };
    format!("  {id:<8} {entity:<14} {error:<36} {status}")
}
