//! Fit-to-container engine for the headway sign.
//!
//! A sign region has a fixed size that is only known once it has been
//! painted. This crate decides how much content goes into such a region:
//! it walks from the most verbose presentation towards the least verbose
//! one, one measured pass at a time, until the content fits or nothing more
//! can be given up.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`measure`]: Overflow measurement against painted extents
//! - [`token`]: Data epochs and content identity tokens
//! - [`step`]: Discrete step resolution over presentation variants
//! - [`allocate`]: Proportional row-budget allocation across sections
//! - [`trim`]: Folded sections and iterative one-unit trimming
//! - [`carousel`]: Time-driven page index for overflow paging
//! - [`error`]: Error types for fitting operations
//!
//! # The measure loop
//!
//! Every session follows the same two-phase cycle. A pure render pass paints
//! the content chosen by the session's current state and attaches the
//! painted extent to a [`NodeRef`]. Then [`FitSession::after_paint`]
//! measures that node and applies at most one change. The caller repeats the
//! cycle while any session reports [`Pass::Changed`].
//!
//! ```
//! use headway_fit::{Axis, FitSession, Metrics, NodeRef, Pass, StepResolver};
//!
//! let mut resolver = StepResolver::new(vec!["long headline", "short"], Axis::X).unwrap();
//! let node = NodeRef::new();
//!
//! loop {
//!     // Render: pretend the region is 8 cells wide.
//!     let width = resolver.step().len() as u16;
//!     node.attach(Metrics::new(width, 1, 8, 1));
//!
//!     // Measure.
//!     if resolver.after_paint(&node) != Pass::Changed {
//!         break;
//!     }
//! }
//! assert_eq!(*resolver.step(), "short");
//! ```

pub mod allocate;
pub mod carousel;
pub mod error;
pub mod measure;
pub mod step;
pub mod token;
pub mod trim;

// Re-export primary types at crate root for convenience
pub use allocate::{SectionSize, assign_sizes};
pub use carousel::{CarouselMode, Tick, TickedIndex, page_duration};
pub use error::{FitError, Result};
pub use measure::{Axis, Measure, Metrics, NodeRef, has_overflow};
pub use step::StepResolver;
pub use token::{Epoch, IdentityToken};
pub use trim::{FoldedSection, TrimSession, TrimStage, trim_once};

/// The outcome of one measurement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// The session changed its state; the region must be rendered and
    /// measured again.
    Changed,
    /// The session committed to its current state and the content fits.
    Settled,
    /// The session committed to its last possible state, which still
    /// overflows.
    Exhausted,
}

impl Pass {
    /// Returns `true` if the region needs another render pass.
    #[must_use]
    pub const fn needs_render(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// A fitting session bound to one measured region.
///
/// Implementations keep their state monotonic within an identity epoch, so
/// repeated calls to [`after_paint`](Self::after_paint) always reach a
/// state where [`is_done`](Self::is_done) holds.
pub trait FitSession {
    /// Measures the painted region and applies at most one change.
    fn after_paint(&mut self, node: &dyn Measure) -> Pass;

    /// Returns `true` once the session has committed to its state.
    fn is_done(&self) -> bool;
}
