//! Terminal Front End
//!
//! Tabbed ratatui interface over an [`AppStore`]. The event loop redraws on
//! every key press, every store change and every tick; store actions run on
//! spawned tasks so input is never blocked while a request is in flight.

mod app;
mod render;

pub use app::{UiAction, UiApp};
pub use render::{draw, form_widget, placeholder_widget, table_widget};

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

use crate::store::AppStore;

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Take over the terminal until the user quits
pub async fn run(store: AppStore, tick_rate: Duration) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &store, tick_rate).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<CrosstermTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut CrosstermTerminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn event_loop(terminal: &mut CrosstermTerminal, store: &AppStore, tick_rate: Duration) -> Result<()> {
    let mut app = UiApp::new();
    let mut events = EventStream::new();
    let mut updates = store.subscribe();
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        let state = store.snapshot();
        terminal.draw(|frame| draw(frame, &app, &state))?;

        tokio::select! {
            _ = ticker.tick() => {}
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match app.handle_key(key, &state) {
                        Some(UiAction::Quit) => break,
                        Some(UiAction::Refresh) => {
                            let store = store.clone();
                            tokio::spawn(async move {
                                let _ = store.refresh().await;
                            });
                        }
                        Some(UiAction::Submit(submission)) => {
                            tracing::debug!(entity = submission.kind.name(), "Form submitted");
                            let store = store.clone();
                            tokio::spawn(async move {
                                let _ = store.submit(submission).await;
                            });
                        }
                        None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}
