//! Terminal setup and teardown.
//!
//! A sign takes over the whole terminal: raw mode, the alternate screen, and
//! no cursor. This module sets that up, puts it back, and installs a panic
//! hook that puts it back even when the app crashes.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

/// The terminal the sign draws on.
pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Terminal setup or teardown failed.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// The terminal could not be taken over.
    #[error("cannot take over the terminal: {0}")]
    Setup(#[source] io::Error),

    /// The terminal could not be given back.
    #[error("cannot restore the terminal: {0}")]
    Restore(#[source] io::Error),
}

/// Takes over the terminal for the sign.
///
/// Enables raw mode, enters the alternate screen and hides the cursor.
///
/// # Errors
///
/// Returns an error if any terminal operation fails.
///
/// # Examples
///
/// ```no_run
/// use headway_tui::terminal;
///
/// let mut terminal = terminal::setup_terminal().expect("failed to setup terminal");
/// // Draw the sign...
/// terminal::restore_terminal(&mut terminal).expect("failed to restore terminal");
/// ```
pub fn setup_terminal() -> Result<AppTerminal, TerminalError> {
    enable_raw_mode().map_err(TerminalError::Setup)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide).map_err(TerminalError::Setup)?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(TerminalError::Setup)
}

/// Gives the terminal back in the state the sign found it.
///
/// This function:
/// - Disables raw mode
/// - Leaves the alternate screen buffer
/// - Shows the cursor
///
/// # Errors
///
/// Returns an error if any terminal operation fails.
///
/// # Examples
///
/// ```no_run
/// use headway_tui::terminal;
///
/// let mut terminal = terminal::setup_terminal().expect("failed to setup terminal");
/// // Draw the sign...
/// terminal::restore_terminal(&mut terminal).expect("failed to restore terminal");
/// ```
pub fn restore_terminal(terminal: &mut AppTerminal) -> Result<(), TerminalError> {
    release(terminal.backend_mut()).map_err(TerminalError::Restore)
}

/// Undoes [`setup_terminal`] on `out`.
fn release(out: &mut impl Write) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen, Show)
}

/// Installs a panic hook that gives the terminal back before the panic
/// message is printed.
///
/// The previous hook still runs afterwards, so the message lands on the
/// main screen. Call this once at startup, before [`setup_terminal`].
///
/// # Order of Operations
///
/// When a panic occurs, the installed hook:
/// 1. Disables raw mode
/// 2. Leaves the alternate screen buffer and shows the cursor
/// 3. Calls the previous panic hook
///
/// # Examples
///
/// ```no_run
/// use headway_tui::terminal;
///
/// terminal::install_panic_hook();
///
/// let mut terminal = terminal::setup_terminal().expect("failed to setup terminal");
/// // A panic from here on leaves a usable terminal behind.
/// terminal::restore_terminal(&mut terminal).expect("failed to restore terminal");
/// ```
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // The terminal may already be gone.
        let _ = release(&mut io::stdout());
        previous(info);
    }));
}
