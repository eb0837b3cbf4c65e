//! Rate-limited error reporting.
//!
//! A sign runs unattended for weeks. When the feed goes down it fails on
//! every poll, and a region that cannot fit fails on every payload; logging
//! each occurrence would bury everything else. [`ErrorReporter`] lets one
//! report per error signature through per [`RateLimiter`] TTL.
//!
//! The limiter is an explicit value handed to the reporter, and time is
//! passed in as `Instant`s, so both are deterministic under test.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Lets one event per signature through per TTL window.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use headway_tui::report::RateLimiter;
///
/// let now = Instant::now();
/// let mut limiter = RateLimiter::new(Duration::from_secs(60));
///
/// assert!(limiter.should_report("http:timeout", now));
/// assert!(!limiter.should_report("http:timeout", now + Duration::from_secs(30)));
/// assert!(limiter.should_report("status:503", now));
/// assert!(limiter.should_report("http:timeout", now + Duration::from_secs(60)));
/// ```
#[derive(Debug, Clone)]
pub struct RateLimiter {
    ttl: Duration,
    last_reported: HashMap<String, Instant>,
}

impl RateLimiter {
    /// Creates a limiter with the given window.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            last_reported: HashMap::new(),
        }
    }

    /// Returns the window length.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns `true` if `signature` has not been reported within the
    /// window ending at `now`, and records `now` if so.
    pub fn should_report(&mut self, signature: &str, now: Instant) -> bool {
        if let Some(&last) = self.last_reported.get(signature)
            && now.saturating_duration_since(last) < self.ttl
        {
            return false;
        }
        self.last_reported.insert(signature.to_string(), now);
        true
    }

    /// Forgets signatures whose window has passed.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.last_reported
            .retain(|_, last| now.saturating_duration_since(*last) < ttl);
    }

    /// Returns the number of signatures currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_reported.len()
    }

    /// Returns `true` if no signatures are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_reported.is_empty()
    }
}

/// Logs feed failures and layout failures through a [`RateLimiter`].
///
/// The reporter also keeps the most recent feed error for the status line,
/// whether or not it was logged.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    limiter: RateLimiter,
    last_message: Option<String>,
    suppressed: usize,
}

impl ErrorReporter {
    /// Creates a reporter that uses `limiter`.
    #[must_use]
    pub fn new(limiter: RateLimiter) -> Self {
        Self {
            limiter,
            last_message: None,
            suppressed: 0,
        }
    }

    /// Reports a feed failure. Returns `true` if it was logged.
    pub fn report(&mut self, signature: &str, message: &str, now: Instant) -> bool {
        self.last_message = Some(message.to_string());
        self.emit(signature, now, || {
            warn!(signature, error = message, "feed update failed");
        })
    }

    /// Reports that `region` settled while still overflowing. Returns
    /// `true` if it was logged.
    pub fn layout_failed(&mut self, region: &str, now: Instant) -> bool {
        let signature = format!("layout:{region}");
        self.emit(&signature, now, || {
            warn!(region, "layout failed: content will overflow");
        })
    }

    /// Returns the most recent feed error message.
    #[must_use]
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Clears the status line after a successful update.
    pub fn clear(&mut self) {
        self.last_message = None;
    }

    /// Returns how many reports the limiter has swallowed.
    #[must_use]
    pub const fn suppressed(&self) -> usize {
        self.suppressed
    }

    fn emit(&mut self, signature: &str, now: Instant, log: impl FnOnce()) -> bool {
        self.limiter.prune(now);
        if self.limiter.should_report(signature, now) {
            log();
            true
        } else {
            self.suppressed += 1;
            debug!(signature, "suppressed repeated error");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn signatures_are_independent() {
        let now = Instant::now();
        let mut limiter = RateLimiter::new(TTL);
        assert!(limiter.should_report("a", now));
        assert!(limiter.should_report("b", now));
        assert!(!limiter.should_report("a", now));
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn prune_drops_expired_signatures() {
        let now = Instant::now();
        let mut limiter = RateLimiter::new(TTL);
        limiter.should_report("old", now);
        limiter.should_report("new", now + Duration::from_secs(50));

        limiter.prune(now + Duration::from_secs(70));
        assert_eq!(limiter.len(), 1);
        assert!(limiter.should_report("old", now + Duration::from_secs(70)));
    }

    #[test]
    fn suppressed_reports_still_update_status() {
        let now = Instant::now();
        let mut reporter = ErrorReporter::new(RateLimiter::new(TTL));

        assert!(reporter.report("status:503", "service unavailable", now));
        assert!(!reporter.report("status:503", "still unavailable", now + Duration::from_secs(5)));
        assert_eq!(reporter.last_message(), Some("still unavailable"));
        assert_eq!(reporter.suppressed(), 1);

        reporter.clear();
        assert_eq!(reporter.last_message(), None);
    }

    #[test]
    fn layout_failures_are_keyed_by_region() {
        let now = Instant::now();
        let mut reporter = ErrorReporter::new(RateLimiter::new(TTL));

        assert!(reporter.layout_failed("departures", now));
        assert!(reporter.layout_failed("alert", now));
        assert!(!reporter.layout_failed("departures", now));
        assert_eq!(reporter.last_message(), None);
    }

    #[test]
    fn reports_again_after_ttl() {
        let now = Instant::now();
        let mut reporter = ErrorReporter::new(RateLimiter::new(TTL));

        assert!(reporter.report("io:NotFound", "missing", now));
        assert!(reporter.report("io:NotFound", "missing", now + TTL));
    }
}
