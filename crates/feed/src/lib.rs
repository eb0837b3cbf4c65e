//! Screen payload feed for headway.
//!
//! This crate gets screen payloads onto the sign: it fetches them, keeps the
//! last good one on disk, and polls for fresh ones in the background.
//!
//! # Overview
//!
//! - [`FeedClient`]: HTTP client for the screens API
//! - [`Source`]: Where payloads come from (API, file, or fixed payload)
//! - [`Poller`] and [`FeedEvent`]: Scoped background polling
//! - [`PayloadCache`] and [`CachedScreen`]: Last-good payload storage
//! - [`Error`]: Error types for feed operations
//!
//! # Failures
//!
//! A failed fetch is not fatal. The poller reports it as
//! [`FeedEvent::Failed`] with a stable signature, keeps the schedule, and
//! the sign goes on showing the previous payload.
//!
//! # Examples
//!
//! ```no_run
//! use headway_config::Config;
//! use headway_feed::{FeedEvent, Poller, Schedule, Source};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let source = Source::from_config(&config.feed)?;
//! let schedule = Schedule {
//!     interval: config.polling.interval(),
//!     max_jitter: config.polling.max_jitter(),
//! };
//!
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let _poller = Poller::spawn(source, schedule, None, tx);
//! while let Some(event) = rx.recv().await {
//!     match event {
//!         FeedEvent::Payload(screen) => println!("{} widgets", screen.widgets.len()),
//!         FeedEvent::Failed { message, .. } => eprintln!("{message}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod poller;
pub mod source;

pub use cache::{CachedScreen, PayloadCache};
pub use client::FeedClient;
pub use error::{Error, Result};
pub use poller::{FeedEvent, Poller, Schedule};
pub use source::Source;
