//! Folded sections and iterative one-unit trimming.
//!
//! A [`FoldedSection`] splits a section's rows into the part that is shown
//! (`above_fold`) and the part that was cut (`below_fold`). [`trim_once`]
//! moves one more unit of content below the fold, following a three-stage
//! policy:
//!
//! 1. **All to max**: every section longer than its `max` is trimmed down to
//!    it in one call.
//! 2. **One towards base**: the longest section above its `base` (or `min`
//!    when unset) loses one unit.
//! 3. **One towards min**: the longest section above its `min` loses one
//!    unit.
//!
//! Ties in the later stages go to the earlier section. Lengths count time
//! entries only; notice rows are never counted.
//!
//! # Trim units
//!
//! A unit is the last time entry of the last departure row that still has
//! entries. The entry moves to the front of the section's `below_fold` as a
//! single-entry copy of its row. When it was the row's only entry, the row
//! itself moves instead. Rows painted after that departure row travel with
//! the unit, so `below_fold` is always the tail of the original content and
//! the fold can be undone with [`FoldedSection::restore`].

use headway_protocol::{Layout, Row, Section};
use tracing::{debug, instrument};

use crate::measure::{Axis, Measure, has_overflow};
use crate::token::IdentityToken;
use crate::{FitSession, Pass};

/// The stage of the trim policy that made a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimStage {
    /// Sections above their `max` were trimmed down to it.
    AllToMax,
    /// One unit was taken from the longest section above its base.
    OneTowardsBase,
    /// One unit was taken from the longest section above its minimum.
    OneTowardsMin,
}

/// A section split into shown and cut content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoldedSection {
    /// Section identifier.
    pub id: String,
    /// Section heading.
    pub name: Option<String>,
    /// Layout policy of the section.
    pub layout: Layout,
    /// Rows that are shown.
    pub above_fold: Vec<Row>,
    /// Rows that were cut, most recently trimmed first.
    pub below_fold: Vec<Row>,
}

impl FoldedSection {
    /// Folds `section` after its first `rows` rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_fit::FoldedSection;
    /// use headway_protocol::{DepartureRow, Layout, Section, TimeEntry};
    ///
    /// let rows = (0..4)
    ///     .map(|i| DepartureRow::new(format!("r{i}"), "1", "Ashmont", vec![TimeEntry::minutes(i)]).into())
    ///     .collect();
    /// let folded = FoldedSection::fold(&Section::new("s", Layout::default(), rows), 3);
    /// assert_eq!(folded.above_fold.len(), 3);
    /// assert_eq!(folded.below_fold[0].id(), "r3");
    /// ```
    #[must_use]
    pub fn fold(section: &Section, rows: usize) -> Self {
        let split = rows.min(section.rows.len());
        Self {
            id: section.id.clone(),
            name: section.name.clone(),
            layout: section.layout,
            above_fold: section.rows[..split].to_vec(),
            below_fold: section.rows[split..].to_vec(),
        }
    }

    /// Wraps `section` with every row shown.
    #[must_use]
    pub fn unfolded(section: &Section) -> Self {
        Self::fold(section, section.rows.len())
    }

    /// Returns the number of time entries shown.
    #[must_use]
    pub fn len(&self) -> usize {
        self.above_fold.iter().map(Row::time_count).sum()
    }

    /// Returns `true` if no time entries are shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the section has rows on either side of the fold.
    #[must_use]
    pub fn has_rows(&self) -> bool {
        !self.above_fold.is_empty() || !self.below_fold.is_empty()
    }

    /// Moves one trim unit below the fold. Returns `false` if no time entries
    /// are left to move.
    pub fn trim_unit(&mut self) -> bool {
        let Some(last) = self.above_fold.iter().rposition(|row| row.time_count() > 0) else {
            return false;
        };
        let mut tail = self.above_fold.split_off(last);
        if let Some(Row::DepartureRow(row)) = tail.first_mut()
            && row.times.len() > 1
        {
            let mut kept = row.clone();
            row.times = kept.times.split_off(kept.times.len() - 1);
            self.above_fold.push(Row::DepartureRow(kept));
        }

        self.below_fold.splice(0..0, tail);
        true
    }

    /// Reassembles the original rows, merging split departure rows back
    /// together.
    #[must_use]
    pub fn restore(&self) -> Vec<Row> {
        let mut rows: Vec<Row> = Vec::with_capacity(self.above_fold.len() + self.below_fold.len());
        for row in self.above_fold.iter().chain(&self.below_fold) {
            if let (Some(Row::DepartureRow(prev)), Row::DepartureRow(next)) = (rows.last_mut(), row)
                && prev.id == next.id
            {
                prev.times.extend(next.times.iter().cloned());
                continue;
            }
            rows.push(row.clone());
        }
        rows
    }
}

/// Applies one step of the trim policy to `sections`.
///
/// Returns the stage that made a change, or `None` once nothing can be
/// trimmed any further.
///
/// # Examples
///
/// ```
/// use headway_fit::{FoldedSection, TrimStage, trim_once};
/// use headway_protocol::{DepartureRow, Layout, Section, TimeEntry};
///
/// let times = (0..5).map(TimeEntry::minutes).collect();
/// let section = Section::new(
///     "s",
///     Layout::new(1, Some(2), Some(3)),
///     vec![DepartureRow::new("r1", "1", "Ashmont", times).into()],
/// );
/// let mut sections = vec![FoldedSection::unfolded(&section)];
///
/// assert_eq!(trim_once(&mut sections), Some(TrimStage::AllToMax));
/// assert_eq!(sections[0].len(), 3);
/// assert_eq!(trim_once(&mut sections), Some(TrimStage::OneTowardsBase));
/// assert_eq!(trim_once(&mut sections), Some(TrimStage::OneTowardsMin));
/// assert_eq!(trim_once(&mut sections), None);
/// assert_eq!(sections[0].len(), 1);
/// ```
pub fn trim_once(sections: &mut [FoldedSection]) -> Option<TrimStage> {
    let mut changed = false;
    for section in sections.iter_mut() {
        let Some(max) = section.layout.max else {
            continue;
        };
        while section.len() > max {
            if !section.trim_unit() {
                break;
            }
            changed = true;
        }
    }
    if changed {
        return Some(TrimStage::AllToMax);
    }

    if let Some(i) = longest(sections, |s| s.layout.trim_floor()) {
        sections[i].trim_unit();
        return Some(TrimStage::OneTowardsBase);
    }
    if let Some(i) = longest(sections, |s| s.layout.min) {
        sections[i].trim_unit();
        return Some(TrimStage::OneTowardsMin);
    }
    None
}

/// Finds the longest section whose length exceeds `floor`, first among
/// equals.
fn longest(sections: &[FoldedSection], floor: impl Fn(&FoldedSection) -> usize) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, section) in sections.iter().enumerate() {
        let len = section.len();
        if len > floor(section) && best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((i, len));
        }
    }
    best.map(|(i, _)| i)
}

/// A trimming session over the sections of one measured region.
///
/// Each overflowing measurement applies one [`trim_once`] step. The session
/// settles when the region fits or when nothing more can be trimmed.
#[derive(Debug, Clone)]
pub struct TrimSession {
    axis: Axis,
    sections: Vec<FoldedSection>,
    token: Option<IdentityToken>,
    done: bool,
    passes: usize,
}

impl TrimSession {
    /// Creates an empty session measuring along `axis`.
    #[must_use]
    pub const fn new(axis: Axis) -> Self {
        Self {
            axis,
            sections: Vec::new(),
            token: None,
            done: false,
            passes: 0,
        }
    }

    /// Binds the session to the content identified by `token`.
    ///
    /// On a token change the sections are rebuilt with `fold` and trimming
    /// starts over. Returns `true` if a reset happened.
    pub fn sync(&mut self, token: IdentityToken, fold: impl FnOnce() -> Vec<FoldedSection>) -> bool {
        if self.token == Some(token) {
            return false;
        }
        self.token = Some(token);
        self.sections = fold();
        self.done = false;
        self.passes = 0;
        true
    }

    /// Returns the current folded sections.
    #[must_use]
    pub fn sections(&self) -> &[FoldedSection] {
        &self.sections
    }

    /// Returns the number of measurements taken since the last reset.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }

    /// Measures `node` and trims one step if it overflows.
    #[instrument(level = "trace", skip_all, fields(passes = self.passes))]
    pub fn measure<M: Measure + ?Sized>(&mut self, node: &M) -> Pass {
        if self.done {
            return Pass::Settled;
        }
        self.passes += 1;
        if !has_overflow(node, self.axis) {
            self.done = true;
            return Pass::Settled;
        }
        match trim_once(&mut self.sections) {
            Some(stage) => {
                debug!(?stage, "content overflows, trimmed");
                Pass::Changed
            }
            None => {
                self.done = true;
                Pass::Exhausted
            }
        }
    }
}

impl FitSession for TrimSession {
    fn after_paint(&mut self, node: &dyn Measure) -> Pass {
        self.measure(node)
    }

    fn is_done(&self) -> bool {
        self.done
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use headway_protocol::{DepartureRow, NoticeRow, TimeEntry};
    use proptest::prelude::*;
    use std::collections::HashMap;

    prop_compose! {
        fn arb_rows()(
            shapes in prop::collection::vec((any::<bool>(), prop::collection::vec(0u32..60, 0..4)), 0..6),
        ) -> Vec<Row> {
            shapes
                .into_iter()
                .enumerate()
                .map(|(i, (notice, minutes))| {
                    if notice {
                        NoticeRow { id: format!("n{i}"), text: "Notice".to_string() }.into()
                    } else {
                        DepartureRow::new(
                            format!("r{i}"),
                            "1",
                            "Ashmont",
                            minutes.into_iter().map(TimeEntry::minutes).collect(),
                        )
                        .into()
                    }
                })
                .collect()
        }
    }

    prop_compose! {
        fn arb_layout()(min in 0usize..4, base in prop::option::of(0usize..3), max in prop::option::of(0usize..4)) -> Layout {
            let base = base.map(|b| min + b);
            let max = max.map(|m| base.unwrap_or(min) + m);
            Layout::new(min, base, max)
        }
    }

    prop_compose! {
        fn arb_section()(id in "[a-z]{1,4}", layout in arb_layout(), rows in arb_rows(), fold in 0usize..8) -> FoldedSection {
            FoldedSection::fold(&Section::new(id, layout, rows), fold)
        }
    }

    fn entries(sections: &[FoldedSection]) -> HashMap<(String, TimeEntry), usize> {
        let mut counts = HashMap::new();
        for section in sections {
            for row in section.above_fold.iter().chain(&section.below_fold) {
                if let Row::DepartureRow(row) = row {
                    for time in &row.times {
                        *counts.entry((row.id.clone(), time.clone())).or_insert(0) += 1;
                    }
                }
            }
        }
        counts
    }

    proptest! {
        /// Trimming relocates time entries and never loses or copies them.
        #[test]
        fn conserves_entries(mut sections in prop::collection::vec(arb_section(), 1..4)) {
            let before = entries(&sections);
            let originals: Vec<Vec<Row>> = sections.iter().map(FoldedSection::restore).collect();
            while trim_once(&mut sections).is_some() {
                prop_assert_eq!(&entries(&sections), &before);
            }
            let restored: Vec<Vec<Row>> = sections.iter().map(FoldedSection::restore).collect();
            prop_assert_eq!(restored, originals);
        }

        /// A fixed point is reached within one call per shown time entry.
        #[test]
        fn terminates(mut sections in prop::collection::vec(arb_section(), 1..4)) {
            let total: usize = sections.iter().map(FoldedSection::len).sum();
            let mut calls = 0;
            while trim_once(&mut sections).is_some() {
                calls += 1;
                prop_assert!(calls <= total);
            }
            let snapshot = sections.clone();
            prop_assert_eq!(trim_once(&mut sections), None);
            prop_assert_eq!(sections, snapshot);
        }

        /// At the fixed point no section is above its minimum.
        #[test]
        fn fixed_point_respects_min(mut sections in prop::collection::vec(arb_section(), 1..4)) {
            while trim_once(&mut sections).is_some() {}
            for section in &sections {
                prop_assert!(section.len() <= section.layout.min);
            }
        }
    }
}
