//! Configuration management for the headway sign.
//!
//! This crate handles loading, validating, and persisting configuration
//! from files, environment variables, and defaults.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`feed`]: Where the screen payload comes from
//! - [`polling`]: Payload refresh interval
//! - [`carousel`]: Paging cadence and error report rate limiting
//! - [`persistence`]: Config file reading and writing
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration Sources (Priority)
//!
//! 1. Environment variables (`HEADWAY_BASE_URL`, `HEADWAY_SCREEN_ID`,
//!    `HEADWAY_API_KEY`)
//! 2. Local config (`./headway.json5` or `./headway.json`)
//! 3. User config (`~/.config/headway/config.json5` or `config.json`)
//! 4. Built-in defaults
//!
//! # Example File
//!
//! ```json5
//! {
//!   feed: {
//!     base_url: "https://screens.example.com",
//!     screen_id: "bus-stop-1",
//!   },
//!   polling: { interval_secs: 15 },
//!   carousel: { max_page_duration_ms: 10000, total_cycle_ms: 30000 },
//!   errors: { ttl_secs: 60 },
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use headway_config::Config;
//!
//! # fn example() -> headway_config::Result<()> {
//! let config = Config::load()?;
//! if let Some(screen) = &config.feed.screen_id {
//!     println!("Showing screen {screen}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod carousel;
pub mod config;
pub mod error;
pub mod feed;
pub mod persistence;
pub mod polling;

// Re-export primary types at crate root for convenience
pub use carousel::{CarouselConfig, ErrorReportConfig};
pub use config::Config;
pub use error::{ConfigError, Result};
pub use feed::FeedConfig;
pub use polling::PollingConfig;
