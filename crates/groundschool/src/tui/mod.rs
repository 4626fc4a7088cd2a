//! Terminal front end for study sessions.
//!
//! Owns the terminal lifecycle (raw mode, alternate screen) and the
//! event loop. State handling lives in [`app`], rendering in `ui`.

mod app;
mod ui;

pub use app::{App, InputMode};

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use crate::error::{Error, Result};

/// How long the event loop waits for input before checking for
/// worker events again.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the study screen until the user quits.
///
/// The terminal is restored even when the event loop fails, so a
/// panic-free error path never leaves the shell in raw mode.
pub fn run(app: &mut App) -> Result<()> {
    let mut terminal = init_terminal()?;
    let outcome = run_event_loop(&mut terminal, app);
    let restored = restore_terminal(&mut terminal);
    outcome?;
    restored
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    debug!("entering event loop");
    loop {
        if app.take_redraw() {
            terminal.draw(|frame| ui::draw(frame, app))?;
        }
        if event::poll(EVENT_POLL_INTERVAL)? {
            app.handle_event(event::read()?);
        }
        app.drain_note_events();
        if app.should_quit() {
            break;
        }
    }
    debug!("leaving event loop");
    Ok(())
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().map_err(|err| Error::terminal(format!("failed to enter raw mode: {err}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|err| Error::terminal(format!("failed to enter alternate screen: {err}")))?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|err| Error::terminal(format!("failed to build terminal: {err}")))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().map_err(|err| Error::terminal(format!("failed to leave raw mode: {err}")))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|err| Error::terminal(format!("failed to leave alternate screen: {err}")))?;
    terminal
        .show_cursor()
        .map_err(|err| Error::terminal(format!("failed to restore cursor: {err}")))?;
    Ok(())
}
