//! Discrete step resolution over presentation variants.
//!
//! A [`StepResolver`] holds an ordered list of presentation steps, most
//! detailed first, and settles on the first one whose painted content fits.
//! The last step is the unconditional fallback: it is accepted whether or not
//! it fits.
//!
//! Within one identity epoch the step index only ever moves forward, one
//! step per measurement pass, so a list of `N` steps settles after at most
//! `N` passes.

use tracing::debug;

use crate::error::{FitError, Result};
use crate::measure::{Axis, Measure, has_overflow};
use crate::token::IdentityToken;
use crate::{FitSession, Pass};

/// Chooses the most detailed step that fits its region.
///
/// # Examples
///
/// ```
/// use headway_fit::{Axis, FitSession, Metrics, Pass, StepResolver};
///
/// let mut resolver = StepResolver::new(vec!["full", "short", "tiny"], Axis::Y).unwrap();
///
/// // "full" paints 3 rows into a 2-row region: advance.
/// assert_eq!(resolver.after_paint(&Metrics::new(0, 3, 0, 2)), Pass::Changed);
/// // "short" paints 1 row: done.
/// assert_eq!(resolver.after_paint(&Metrics::new(0, 1, 0, 2)), Pass::Settled);
/// assert_eq!(*resolver.step(), "short");
/// ```
#[derive(Debug, Clone)]
pub struct StepResolver<S> {
    steps: Vec<S>,
    axis: Axis,
    index: usize,
    done: bool,
    passes: usize,
    token: Option<IdentityToken>,
}

impl<S> StepResolver<S> {
    /// Creates a resolver over `steps`, ordered most detailed first.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::EmptySteps`] if `steps` is empty, since there
    /// would be no fallback to settle on.
    pub fn new(steps: Vec<S>, axis: Axis) -> Result<Self> {
        if steps.is_empty() {
            return Err(FitError::EmptySteps);
        }
        Ok(Self {
            steps,
            axis,
            index: 0,
            done: false,
            passes: 0,
            token: None,
        })
    }

    /// Creates a resolver over a fixed array of steps.
    ///
    /// An empty array is rejected at compile time, so unlike
    /// [`new`](Self::new) this cannot fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_fit::{Axis, StepResolver};
    ///
    /// let resolver = StepResolver::fixed(["full", "short"], Axis::X);
    /// assert_eq!(*resolver.step(), "full");
    /// ```
    #[must_use]
    pub fn fixed<const N: usize>(steps: [S; N], axis: Axis) -> Self {
        const { assert!(N > 0, "a step list needs a fallback step") };
        Self {
            steps: Vec::from(steps),
            axis,
            index: 0,
            done: false,
            passes: 0,
            token: None,
        }
    }

    /// Binds the resolver to the content identified by `token`.
    ///
    /// If the token differs from the one currently bound, progress is reset
    /// to the first step. Returns `true` if a reset happened.
    pub fn sync(&mut self, token: IdentityToken) -> bool {
        if self.token == Some(token) {
            return false;
        }
        self.token = Some(token);
        self.reset();
        true
    }

    /// Resets progress to the first step without changing the bound token.
    pub fn reset(&mut self) {
        self.index = 0;
        self.done = false;
        self.passes = 0;
    }

    /// Returns the currently selected step.
    #[must_use]
    pub fn step(&self) -> &S {
        // `index` never exceeds the last position and `steps` is non-empty.
        &self.steps[self.index]
    }

    /// Returns the index of the currently selected step.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns all steps, most detailed first.
    #[must_use]
    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    /// Returns `true` if the current step is the fallback.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.steps.len()
    }

    /// Returns the number of measurements taken in the current epoch.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }

    /// Measures `node` and advances by at most one step.
    ///
    /// Returns [`Pass::Changed`] when the step advanced and the region has
    /// to be painted again, [`Pass::Settled`] once the content fits, and
    /// [`Pass::Exhausted`] when the fallback step still overflows. A
    /// single-step resolver settles without measuring.
    pub fn measure<M: Measure + ?Sized>(&mut self, node: &M) -> Pass {
        if self.done {
            return Pass::Settled;
        }
        if self.steps.len() == 1 {
            self.done = true;
            return Pass::Settled;
        }

        self.passes += 1;
        let overflowing = has_overflow(node, self.axis);
        if !overflowing {
            self.done = true;
            return Pass::Settled;
        }
        if self.is_last() {
            self.done = true;
            return Pass::Exhausted;
        }

        self.index += 1;
        debug!(step = self.index, axis = ?self.axis, "content overflows, advancing step");
        Pass::Changed
    }
}

impl<S> FitSession for StepResolver<S> {
    fn after_paint(&mut self, node: &dyn Measure) -> Pass {
        self.measure(node)
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::Metrics;
    use crate::token::Epoch;

    const FITS: Metrics = Metrics::new(0, 1, 0, 2);
    const OVERFLOWS: Metrics = Metrics::new(0, 3, 0, 2);

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Detail {
        Full,
        Abbreviated,
        Collapsed,
    }

    fn resolver() -> StepResolver<Detail> {
        StepResolver::fixed(
            [Detail::Full, Detail::Abbreviated, Detail::Collapsed],
            Axis::Y,
        )
    }

    #[test]
    fn empty_steps_rejected() {
        let result = StepResolver::<Detail>::new(Vec::new(), Axis::X);
        assert_eq!(result.unwrap_err(), FitError::EmptySteps);
    }

    #[test]
    fn single_step_settles_without_measuring() {
        let mut resolver = StepResolver::new(vec![Detail::Full], Axis::Y).unwrap();
        assert_eq!(resolver.after_paint(&OVERFLOWS), Pass::Settled);
        assert!(resolver.is_done());
        assert_eq!(resolver.passes(), 0);
    }

    #[test]
    fn fitting_first_step_settles_immediately() {
        let mut resolver = resolver();
        assert_eq!(resolver.after_paint(&FITS), Pass::Settled);
        assert_eq!(*resolver.step(), Detail::Full);
        assert_eq!(resolver.passes(), 1);
    }

    #[test]
    fn last_step_is_accepted_even_when_overflowing() {
        let mut resolver = resolver();
        assert_eq!(resolver.after_paint(&OVERFLOWS), Pass::Changed);
        assert_eq!(resolver.after_paint(&OVERFLOWS), Pass::Changed);
        assert_eq!(resolver.after_paint(&OVERFLOWS), Pass::Exhausted);
        assert_eq!(*resolver.step(), Detail::Collapsed);
        assert!(resolver.is_done());

        // Further passes change nothing.
        assert_eq!(resolver.after_paint(&OVERFLOWS), Pass::Settled);
        assert_eq!(resolver.passes(), 3);
    }

    #[test]
    fn detached_node_settles_on_current_step() {
        let mut resolver = resolver();
        assert_eq!(resolver.after_paint(&None::<Metrics>), Pass::Settled);
        assert_eq!(*resolver.step(), Detail::Full);
    }

    #[test]
    fn token_change_resets_progress() {
        let mut resolver = resolver();
        assert!(resolver.sync(IdentityToken::of(Epoch::ZERO, "a")));
        resolver.after_paint(&OVERFLOWS);
        resolver.after_paint(&FITS);
        assert_eq!(resolver.index(), 1);
        assert!(resolver.is_done());

        // Same token: nothing happens.
        assert!(!resolver.sync(IdentityToken::of(Epoch::ZERO, "a")));
        assert_eq!(resolver.index(), 1);

        // New epoch: back to the first step.
        assert!(resolver.sync(IdentityToken::of(Epoch::ZERO.next(), "a")));
        assert_eq!(resolver.index(), 0);
        assert!(!resolver.is_done());
        assert_eq!(resolver.passes(), 0);
    }

    #[test]
    fn settles_on_abbreviated() {
        // Full paints 3 rows and Abbreviated paints 1 row in a 2-row region.
        let mut resolver = resolver();
        let mut advances = 0;
        loop {
            let painted = match resolver.step() {
                Detail::Full => 3,
                Detail::Abbreviated | Detail::Collapsed => 1,
            };
            match resolver.after_paint(&Metrics::new(0, painted, 0, 2)) {
                Pass::Changed => advances += 1,
                Pass::Settled | Pass::Exhausted => break,
            }
        }
        assert_eq!(*resolver.step(), Detail::Abbreviated);
        assert_eq!(advances, 1);
    }
}
