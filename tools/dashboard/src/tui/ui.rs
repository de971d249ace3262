//! Layout and rendering for the terminal dashboard.
//!
//! Top to bottom: header, three summary cards, the outbox table, the
//! selectable DLQ table, and a status bar with the metrics endpoint.

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use syncwatch_domain::dlq::{DlqRecord, DlqStats};
use syncwatch_domain::outbox::{OutboxRecord, OutboxStats};

use super::app::App;
use crate::domain::types::{ABSENT_FIELD, Snapshot};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(5), // Summary cards
            Constraint::Min(6),    // Outbox table
            Constraint::Min(6),    // DLQ table
            Constraint::Length(2), // Status bar
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_cards(f, app, chunks[1]);
    draw_outbox_table(f, app, chunks[2]);
    draw_dlq_table(f, app, chunks[3]);
    draw_status_bar(f, app, chunks[4]);
}

// ── Header ──────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from("Monitor the outbox pipeline, DLQ recovery, and trigger manual actions."),
        Line::from(Span::styled(
            format!("Relay: {}", app.base_url),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let header = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Sync Service - Operational Dashboard "),
    );
    f.render_widget(header, area);
}

// ── Summary cards ───────────────────────────────────────────────────────────

fn draw_cards(f: &mut Frame, app: &App, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let outbox_stats = OutboxStats::from_records(&app.outbox.rows);
    let dlq_stats = DlqStats::from_records(&app.dlq.rows);

    let outbox_caption = if app.outbox.has_data() {
        "Latest 100 records shown"
    } else {
        "Loading latest batch…"
    };
    draw_card(
        f,
        cards[0],
        " Outbox events ",
        &outbox_stats.total.to_string(),
        outbox_caption,
        Color::Cyan,
    );

    draw_card(
        f,
        cards[1],
        " Pending sync ",
        &outbox_stats.pending.to_string(),
        &format!("{} already processed", outbox_stats.processed),
        if outbox_stats.pending > 0 {
            Color::Yellow
        } else {
            Color::Green
        },
    );

    let dlq_caption = if app.dlq.has_data() {
        "Unresolved items awaiting retry"
    } else {
        "Checking DLQ…"
    };
    draw_card(
        f,
        cards[2],
        " DLQ alerts ",
        &dlq_stats.unresolved.to_string(),
        dlq_caption,
        if dlq_stats.unresolved > 0 {
            Color::Red
        } else {
            Color::Green
        },
    );
}

fn draw_card(f: &mut Frame, area: Rect, title: &str, value: &str, caption: &str, color: Color) {
    let text = vec![
        Line::from(Span::styled(
            value.to_owned(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            caption.to_owned(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let card = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title.to_owned()));
    f.render_widget(card, area);
}

// ── Outbox table ────────────────────────────────────────────────────────────

fn draw_outbox_table(f: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible_outbox();
    let title = format!(
        " Latest Outbox Events (showing {} of {}) ",
        visible.len(),
        app.outbox.rows.len()
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let header = Paragraph::new(Span::styled(
        format!(
            "{:<8} {:<14} {:<10} {:<10} {}",
            "ID", "Entity", "Operation", "Status", "Created"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    f.render_widget(header, rows[0]);

    let items: Vec<ListItem> = if visible.is_empty() {
        vec![empty_row(&app.outbox, "No outbox events yet.", "Loading latest batch…")]
    } else {
        visible.iter().map(outbox_row).collect()
    };
    f.render_widget(List::new(items), rows[1]);
}

fn outbox_row(record: &OutboxRecord) -> ListItem<'static> {
    let id = record
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| ABSENT_FIELD.to_owned());
    let entity = record.entity_type.as_deref().unwrap_or(ABSENT_FIELD);
    let op = record.op.as_deref().unwrap_or(ABSENT_FIELD);
    let created = record
        .created_at
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ABSENT_FIELD.to_owned());

    let (status, status_color) = if record.processed {
        ("Processed", Color::Green)
    } else {
        ("Pending", Color::Yellow)
    };

    ListItem::new(Line::from(vec![
        Span::raw(format!(
            "{:<8} {:<14} {:<10} ",
            clip(&id, 8),
            clip(entity, 14),
            clip(op, 10)
        )),
        Span::styled(format!("{status:<10} "), Style::default().fg(status_color)),
        Span::styled(created, Style::default().fg(Color::DarkGray)),
    ]))
}

// ── DLQ table ───────────────────────────────────────────────────────────────

fn draw_dlq_table(f: &mut Frame, app: &mut App, area: Rect) {
    let dlq_stats = DlqStats::from_records(&app.dlq.rows);
    let title = format!(" Dead Letter Queue ({} unresolved) ", dlq_stats.unresolved);
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let header = Paragraph::new(Span::styled(
        format!("{:<8} {:<14} {:<36} {}", "ID", "Entity", "Error", "Status"),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    f.render_widget(header, rows[0]);

    let visible = app.visible_dlq();
    let items: Vec<ListItem> = if visible.is_empty() {
        vec![empty_row(&app.dlq, "DLQ is empty", "Checking DLQ…")]
    } else {
        visible.iter().map(dlq_row).collect()
    };
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, rows[1], &mut app.dlq_list_state);
}

fn dlq_row(record: &DlqRecord) -> ListItem<'static> {
    let id = record
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| ABSENT_FIELD.to_owned());
    let entity = record.entity_type.as_deref().unwrap_or(ABSENT_FIELD);
    let error = record.error_msg.as_deref().unwrap_or(ABSENT_FIELD);

    let (status, status_color) = if record.resolved {
        ("Resolved", Color::DarkGray)
    } else {
        ("Open", Color::Red)
    };

    // Dimmed rows are the ones the retry key will refuse.
    let row_style = if record.can_retry() {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    ListItem::new(Line::from(vec![
        Span::styled(
            format!(
                "{:<8} {:<14} {:<36} ",
                clip(&id, 8),
                clip(entity, 14),
                clip(error, 36)
            ),
            row_style,
        ),
        Span::styled(status.to_owned(), Style::default().fg(status_color)),
    ]))
}

fn empty_row<T>(snapshot: &Snapshot<T>, empty_text: &str, loading_text: &str) -> ListItem<'static> {
    let text = if snapshot.has_data() {
        empty_text.to_owned()
    } else {
        loading_text.to_owned()
    };
    ListItem::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

// ── Status bar ──────────────────────────────────────────────────────────────

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let stale = app.outbox.is_stale() || app.dlq.is_stale();
    let indicator = if stale {
        Span::styled(
            " STALE ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            " LIVE ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    };

    let message = if let Some(status) = &app.status {
        status.clone()
    } else if stale {
        app.outbox
            .last_error
            .as_deref()
            .or(app.dlq.last_error.as_deref())
            .unwrap_or("relay unreachable")
            .to_owned()
    } else {
        match last_update(app) {
            Some(updated) => format!("Updated {updated}"),
            None => "Waiting for first snapshot".to_owned(),
        }
    };

    let status_line = Line::from(vec![indicator, Span::raw(" "), Span::raw(message)]);
    f.render_widget(Paragraph::new(status_line), rows[0]);

    let help = Line::from(vec![
        Span::styled(
            " q:quit  j/k:select  r:retry  a:add  u:update  g:refresh ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(" Metrics: {}", app.metrics_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(help), rows[1]);
}

fn last_update(app: &App) -> Option<String> {
    let newest = match (app.outbox.fetched_at, app.dlq.fetched_at) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };
    newest.map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
}

/// Truncate to `width` characters, marking the cut with an ellipsis.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
