//! Background payload polling.
//!
//! A [`Poller`] owns a tokio task that fetches from a [`Source`] on a fixed
//! cadence and reports each outcome as a [`FeedEvent`]. The task lives
//! exactly as long as the `Poller`: dropping it aborts the task, on every
//! exit path of the owner.

use std::sync::Arc;
use std::time::Duration;

use headway_protocol::ScreenData;
use rand::Rng;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::PayloadCache;
use crate::source::Source;

/// The outcome of one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A fresh payload arrived.
    Payload(Box<ScreenData>),
    /// The fetch failed.
    Failed {
        /// Stable grouping key for the failure.
        signature: String,
        /// Human-readable description.
        message: String,
    },
}

/// Polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Time between polls.
    pub interval: Duration,
    /// Upper bound on the random delay added to each wait.
    pub max_jitter: Duration,
}

impl Schedule {
    /// A schedule without jitter.
    #[must_use]
    pub const fn every(interval: Duration) -> Self {
        Self {
            interval,
            max_jitter: Duration::ZERO,
        }
    }

    /// Returns the next wait, including jitter.
    fn next_wait(&self) -> Duration {
        let max_ms = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return self.interval;
        }
        self.interval + Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
    }
}

/// A running poll loop.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use headway_feed::{FeedEvent, Poller, Schedule, Source};
/// use headway_protocol::dummy::dummy_screen;
///
/// # async fn example() {
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
/// let source = Source::Static(Box::new(dummy_screen()));
/// let _poller = Poller::spawn(source, Schedule::every(Duration::from_secs(15)), None, tx);
///
/// if let Some(FeedEvent::Payload(screen)) = rx.recv().await {
///     println!("got {}", screen.screen_id);
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct Poller {
    handle: JoinHandle<()>,
    refresh: Arc<Notify>,
}

impl Poller {
    /// Starts polling `source`, fetching immediately and then on `schedule`.
    ///
    /// Successful payloads are stored in `cache` when one is given. The loop
    /// ends when the receiving side of `tx` is dropped.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(
        source: Source,
        schedule: Schedule,
        cache: Option<PayloadCache>,
        tx: mpsc::UnboundedSender<FeedEvent>,
    ) -> Self {
        let refresh = Arc::new(Notify::new());
        let wake = Arc::clone(&refresh);

        let handle = tokio::spawn(async move {
            let key = source.cache_key();
            loop {
                let event = match source.fetch().await {
                    Ok(screen) => {
                        if let Some(cache) = &cache
                            && let Err(e) = cache.save(&key, &screen)
                        {
                            warn!(error = %e, "failed to cache screen");
                        }
                        FeedEvent::Payload(Box::new(screen))
                    }
                    Err(e) => FeedEvent::Failed {
                        signature: e.signature(),
                        message: e.to_string(),
                    },
                };

                if tx.send(event).is_err() {
                    debug!("feed receiver dropped, stopping poller");
                    break;
                }

                tokio::select! {
                    () = tokio::time::sleep(schedule.next_wait()) => {}
                    () = wake.notified() => debug!("refresh requested"),
                }
            }
        });

        Self { handle, refresh }
    }

    /// Fetches now instead of waiting for the next scheduled poll.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Returns `true` once the poll loop has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
