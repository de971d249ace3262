//! Terminal dashboard state and key handling.
//!
//! `App` is pure state: the event loop feeds it fresh snapshots before every
//! draw and routes key presses through `handle_key`, which never does IO
//! itself. Anything that needs the relay comes back as an `ActionRequest`
//! for the loop to execute.

use crossterm::event::KeyCode;
use ratatui::widgets::ListState;

use syncwatch_domain::dlq::DlqRecord;
use syncwatch_domain::outbox::OutboxRecord;

use crate::domain::types::{Snapshot, TABLE_ROWS};

/// Work a key press asks the event loop to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRequest {
    None,
    Retry,
    AddSample,
    UpdateRandom,
    RefreshAll,
}

pub struct App {
    pub base_url: String,
    pub metrics_url: String,
    pub outbox: Snapshot<OutboxRecord>,
    pub dlq: Snapshot<DlqRecord>,
    pub dlq_list_state: ListState,
    /// Transient feedback from the last action, shown in the status bar.
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(base_url: &str, metrics_url: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            metrics_url: metrics_url.to_owned(),
            outbox: Snapshot::empty(),
            dlq: Snapshot::empty(),
            dlq_list_state: ListState::default(),
            status: None,
            should_quit: false,
        }
    }

    /// Take the latest snapshots and keep the selection on a visible row.
    pub fn sync(&mut self, outbox: Snapshot<OutboxRecord>, dlq: Snapshot<DlqRecord>) {
        self.outbox = outbox;
        self.dlq = dlq;
        let visible = self.visible_dlq().len();
        match (visible, self.dlq_list_state.selected()) {
            (0, _) => self.dlq_list_state.select(None),
            (n, Some(i)) if i >= n => self.dlq_list_state.select(Some(n - 1)),
            (_, None) => self.dlq_list_state.select(Some(0)),
            _ => {}
        }
    }

    /// Outbox rows currently on screen.
    pub fn visible_outbox(&self) -> &[OutboxRecord] {
        let n = self.outbox.rows.len().min(TABLE_ROWS);
        &self.outbox.rows[..n]
    }

    /// DLQ rows currently on screen. The selection index is relative to
    /// this slice.
    pub fn visible_dlq(&self) -> &[DlqRecord] {
        let n = self.dlq.rows.len().min(TABLE_ROWS);
        &self.dlq.rows[..n]
    }

    pub fn selected_dlq(&self) -> Option<&DlqRecord> {
        self.dlq_list_state
            .selected()
            .and_then(|i| self.visible_dlq().get(i))
    }

    pub fn handle_key(&mut self, key: KeyCode) -> ActionRequest {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                ActionRequest::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                ActionRequest::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
                ActionRequest::None
            }
            KeyCode::Char('r') => ActionRequest::Retry,
            KeyCode::Char('a') => ActionRequest::AddSample,
            KeyCode::Char('u') => ActionRequest::UpdateRandom,
            KeyCode::Char('g') => ActionRequest::RefreshAll,
            _ => ActionRequest::None,
        }
    }

    fn select_next(&mut self) {
        let visible = self.visible_dlq().len();
        if visible == 0 {
            return;
        }
        let next = match self.dlq_list_state.selected() {
            Some(i) => (i + 1).min(visible - 1),
            None => 0,
        };
        self.dlq_list_state.select(Some(next));
    }

    fn select_previous(&mut self) {
        if self.visible_dlq().is_empty() {
            return;
        }
        let previous = match self.dlq_list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.dlq_list_state.select(Some(previous));
    }
}
