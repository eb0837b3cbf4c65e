//! Time-driven page index for overflow paging.
//!
//! Content that cannot fit statically is split into pages and cycled on a
//! timer. [`TickedIndex`] is the single paging primitive shared by every
//! carousel on the sign: the caller owns the clock and passes `Instant`s in,
//! so the index is fully deterministic under test.
//!
//! # Modes
//!
//! - [`CarouselMode::Loop`] wraps back to the first page forever.
//! - [`CarouselMode::Once`] stops on the last page and reports
//!   [`Tick::Completed`] exactly once per [`restart`](TickedIndex::restart).

use std::time::{Duration, Instant};

/// Shortest interval a carousel accepts.
const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// How a carousel behaves after its last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CarouselMode {
    /// Wrap around to the first page.
    #[default]
    Loop,
    /// Hold the last page and report completion.
    Once,
}

/// What a call to [`TickedIndex::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tick {
    /// Nothing was due.
    Idle,
    /// The page index moved on.
    Advanced,
    /// A run-once carousel reached its last page.
    Completed,
}

/// A page index advanced by the caller's clock.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use headway_fit::{CarouselMode, Tick, TickedIndex};
///
/// let start = Instant::now();
/// let second = Duration::from_secs(1);
/// let mut pages = TickedIndex::new(3, second, CarouselMode::Loop);
/// pages.start(start);
///
/// assert_eq!(pages.tick(start), Tick::Idle);
/// assert_eq!(pages.tick(start + second), Tick::Advanced);
/// assert_eq!(pages.page_index(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TickedIndex {
    num_pages: usize,
    interval: Duration,
    mode: CarouselMode,
    page_index: usize,
    deadline: Option<Instant>,
    completed: bool,
}

impl TickedIndex {
    /// Creates a stopped carousel over `num_pages` pages.
    #[must_use]
    pub fn new(num_pages: usize, interval: Duration, mode: CarouselMode) -> Self {
        Self {
            num_pages,
            interval: interval.max(MIN_INTERVAL),
            mode,
            page_index: 0,
            deadline: None,
            completed: false,
        }
    }

    /// Starts the timer from `now`. A carousel with fewer than two pages
    /// never schedules a deadline.
    pub fn start(&mut self, now: Instant) {
        self.deadline = (self.num_pages > 1).then(|| now + self.interval);
    }

    /// Stops the timer, keeping the current page.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Goes back to the first page of `num_pages` and starts the timer.
    ///
    /// Clears the completion flag, so a run-once carousel can complete
    /// again.
    pub fn restart(&mut self, num_pages: usize, now: Instant) {
        self.num_pages = num_pages;
        self.page_index = 0;
        self.completed = false;
        self.start(now);
    }

    /// Changes the interval used from the next scheduled advance on.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.max(MIN_INTERVAL);
    }

    /// Returns the current page, always below [`num_pages`](Self::num_pages)
    /// when there is at least one page.
    #[must_use]
    pub const fn page_index(&self) -> usize {
        self.page_index
    }

    /// Returns the number of pages.
    #[must_use]
    pub const fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Returns the time between page changes.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` once a run-once carousel has reached its last page.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns when the next page change is due, if one is scheduled.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Advances the page if its deadline has passed.
    ///
    /// At most one page is advanced per call. A run-once carousel with a
    /// single page completes on its first tick.
    pub fn tick(&mut self, now: Instant) -> Tick {
        if self.num_pages == 0 {
            return Tick::Idle;
        }
        if self.mode == CarouselMode::Once && !self.completed && self.on_last_page() {
            return self.complete();
        }

        let Some(deadline) = self.deadline else {
            return Tick::Idle;
        };
        if now < deadline {
            return Tick::Idle;
        }

        self.page_index = (self.page_index + 1) % self.num_pages;
        self.deadline = Some(now + self.interval);
        if self.mode == CarouselMode::Once && self.on_last_page() {
            return self.complete();
        }
        Tick::Advanced
    }

    fn on_last_page(&self) -> bool {
        self.page_index + 1 == self.num_pages
    }

    fn complete(&mut self) -> Tick {
        self.completed = true;
        self.deadline = None;
        Tick::Completed
    }
}

/// Returns how long each of `num_pages` pages is shown.
///
/// The cycle is spread evenly across pages, but no page lingers past
/// `max_page`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use headway_fit::page_duration;
///
/// let cycle = Duration::from_secs(30);
/// let cap = Duration::from_secs(10);
/// assert_eq!(page_duration(2, cycle, cap), Duration::from_secs(10));
/// assert_eq!(page_duration(6, cycle, cap), Duration::from_secs(5));
/// ```
#[must_use]
pub fn page_duration(num_pages: usize, total_cycle: Duration, max_page: Duration) -> Duration {
    if num_pages == 0 {
        return max_page;
    }
    let pages = u32::try_from(num_pages).unwrap_or(u32::MAX);
    (total_cycle / pages).min(max_page)
}
