//! Interactive candidate picker.
//!
//! A minimal selection front-end over the candidate list: an input bar that
//! filters as you type, a navigable list, Enter to accept, Esc to cancel.
//! Uses ratatui for rendering and crossterm for terminal management.
//!
//! The picker is host-side glue: it consumes the list the
//! [`CandidateListBuilder`](crate::CandidateListBuilder) produced and hands
//! the selected candidate back. Styling decisions live here, derived from
//! the label spans the formatter recorded.

use std::io;
use std::panic;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

mod app;
mod ui;

pub use app::{Outcome, Picker};

use crate::models::Candidate;

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Always called before returning, even on error, to prevent terminal
/// corruption.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before panicking.
///
/// The original hook is preserved and called after restoration.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Runs the picker over the given candidates.
///
/// Returns the accepted candidate, or `None` if the user cancelled.
///
/// # Errors
///
/// Returns an error if terminal initialization, event polling, or
/// rendering fails. Terminal state is restored in every case.
pub fn pick(candidates: Vec<Candidate>) -> Result<Option<Candidate>> {
    init_panic_hook();

    let mut picker = Picker::new(candidates);
    let mut terminal = init_terminal()?;

    let accepted = run_event_loop(&mut picker, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    Ok(if accepted? {
        picker.into_selection()
    } else {
        None
    })
}

/// Polls for keyboard events, updates picker state, and re-renders until
/// the user accepts or cancels. Returns whether a selection was accepted.
fn run_event_loop(
    picker: &mut Picker,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<bool> {
    loop {
        terminal.draw(|frame| {
            ui::draw(frame, picker);
        })?;

        if crossterm_event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
        {
            match picker.handle_key(key) {
                Outcome::Continue => {}
                Outcome::Accept => return Ok(true),
                Outcome::Cancel => return Ok(false),
            }
        }
    }
}
