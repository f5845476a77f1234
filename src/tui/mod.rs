//! Terminal front end: one loop serializing the tick and key streams.

pub mod app;
pub mod ui;

use anyhow::Result;
use chrono::Local;
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use std::io;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::debug;

use crate::notify::notifier::Notifier;
use crate::pomodoro::pomodoro::TICK_INTERVAL_MS;
use app::App;

/// Puts the terminal back in cooked mode on every exit path, panics included.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Take over the terminal, run until the user quits, then restore it.
pub async fn run<N: Notifier>(app: &mut App<N>) -> Result<()> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    run_app(&mut terminal, app).await
}

async fn run_app<B: Backend, N: Notifier>(
    terminal: &mut Terminal<B>,
    app: &mut App<N>,
) -> Result<()> {
    let mut ticker = interval(Duration::from_millis(TICK_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut events = EventStream::new();

    loop {
        if app.is_finished() {
            return Ok(());
        }

        terminal.draw(|f| ui::draw(f, app, Local::now()))?;

        tokio::select! {
            _ = ticker.tick() => app.on_tick(Local::now()),
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Local::now());
                }
                Some(Ok(Event::Resize(width, height))) => {
                    debug!("Terminal resized to {}x{}", width, height);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_is_harmless_outside_raw_mode() {
        restore_terminal();
        restore_terminal();
        drop(TerminalGuard);
    }
}
