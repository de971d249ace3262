//! Terminal UI entry point and event loop.

pub mod app;
pub mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::DashboardConfig;
use crate::domain::repository::{RefreshPort, RelayCommandPort, RelayQueryPort};
use crate::domain::types::ResourceKey;
use crate::usecase::actions::{ActionDispatcher, RetryOutcome};
use crate::usecase::poll::Pollers;

use app::{ActionRequest, App};

/// Redraw cadence. Key presses are picked up at this granularity; data
/// arrives whenever the pollers publish.
const FRAME: Duration = Duration::from_millis(250);

/// Run the dashboard until the user quits.
pub async fn run<Q, C>(api: Arc<Q>, commands: C, config: &DashboardConfig) -> Result<()>
where
    Q: RelayQueryPort + Send + Sync + 'static,
    C: RelayCommandPort,
{
    let pollers = Pollers::start(api, config.refresh_interval);
    let dispatcher = ActionDispatcher {
        api: commands,
        refresher: pollers.refresher(),
    };

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config.base_url, &config.metrics_url);
    let result = event_loop(&mut terminal, &mut app, &pollers, &dispatcher).await;

    // Restore the terminal even when the loop failed.
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("restore cursor")?;

    result
}

async fn event_loop<C, R>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    pollers: &Pollers,
    dispatcher: &ActionDispatcher<C, R>,
) -> Result<()>
where
    C: RelayCommandPort,
    R: RefreshPort,
{
    loop {
        app.sync(pollers.outbox.snapshot(), pollers.dlq.snapshot());
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let request = app.handle_key(key.code);
                    dispatch(request, app, pollers, dispatcher).await;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn dispatch<C, R>(
    request: ActionRequest,
    app: &mut App,
    pollers: &Pollers,
    dispatcher: &ActionDispatcher<C, R>,
) where
    C: RelayCommandPort,
    R: RefreshPort,
{
    match request {
        ActionRequest::None => {}
        ActionRequest::RefreshAll => {
            pollers.refresh(&[ResourceKey::Outbox, ResourceKey::Dlq]);
            app.status = Some("Refreshing".to_owned());
        }
        ActionRequest::Retry => {
            let Some(entry) = app.selected_dlq().cloned() else {
                app.status = Some("No DLQ entry selected".to_owned());
                return;
            };
            match dispatcher.retry(&entry).await {
                Ok(RetryOutcome::Requested) => {
                    let label = entry
                        .id
                        .as_ref()
                        .map(|id| id.to_string())
                        .unwrap_or_default();
                    app.status = Some(format!("Retry requested for entry {label}"));
                }
                Ok(RetryOutcome::SkippedResolved) => {
                    app.status = Some("Entry is already resolved".to_owned());
                }
                Ok(RetryOutcome::SkippedMissingId) => {
                    app.status = Some("Entry has no identifier to retry".to_owned());
                }
                Err(e) => {
                    tracing::error!(error = %e, kind = e.kind(), "retry failed");
                    app.status = Some(format!("Retry failed: {e}"));
                }
            }
        }
        ActionRequest::AddSample => match dispatcher.add_sample().await {
            Ok(()) => app.status = Some("Sample user inserted".to_owned()),
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "add sample failed");
                app.status = Some(format!("Add sample failed: {e}"));
            }
        },
        ActionRequest::UpdateRandom => match dispatcher.update_random().await {
            Ok(()) => app.status = Some("Random user updated".to_owned()),
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "update random failed");
                app.status = Some(format!("Update random failed: {e}"));
            }
        },
    }
}
