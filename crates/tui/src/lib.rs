//! Terminal UI for the headway transit sign.
//!
//! This crate renders a screen payload with Ratatui and fits every widget
//! to the cells it is given. Fitting is a loop over a pure render pass and
//! a measure pass: regions paint into a scratch buffer, measure what they
//! painted, and step down one presentation variant or trim one departure at
//! a time until nothing overflows. Only the settled frame is drawn.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`app`]: Main application struct, settle loop and run loop
//! - [`widgets`]: Fitted regions and the widget registry
//! - [`paint`]: Paints text and measures its extent
//! - [`report`]: Rate-limited error reporting
//! - [`terminal`]: Terminal setup, teardown, and panic handling
//! - [`event`]: Event handling and key mappings
//! - [`layout`]: Size thresholds and timing bounds
//!
//! # Example
//!
//! ```no_run
//! use headway_config::Config;
//! use headway_protocol::dummy::dummy_screen;
//! use headway_tui::{App, terminal};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     terminal::install_panic_hook();
//!     let mut terminal = terminal::setup_terminal()?;
//!
//!     let mut app = App::new(dummy_screen(), &Config::default());
//!     let result = app.run(&mut terminal, None).await;
//!
//!     terminal::restore_terminal(&mut terminal)?;
//!     result
//! }
//! ```

pub mod app;
pub mod event;
pub mod layout;
pub mod paint;
pub mod report;
pub mod terminal;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export primary types at crate root for convenience
pub use app::{App, FeedHandle, Settle};
pub use report::{ErrorReporter, RateLimiter};
pub use widgets::{Region, Registry, Strategy};
