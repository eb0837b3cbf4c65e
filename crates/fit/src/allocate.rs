//! Proportional row-budget allocation across sections.
//!
//! The departures widget has a fixed number of body rows to share between
//! its sections. [`assign_sizes`] splits that budget in proportion to each
//! section's natural size, rounding so that the result sums to the budget
//! exactly and deviates as little as possible from the real-valued shares.
//!
//! # Rounding
//!
//! Every section starts at its minimum. The remaining rows are handed out
//! one at a time to the section whose marginal deviation cost is lowest,
//! ties going to the earlier section. Deviation `|k - t|` is convex in `k`,
//! so this greedy walk reaches the same optimum as trying every
//! floor/ceiling combination, in `O(rows * sections)` instead of
//! exponential time.
//!
//! # Infeasible budgets
//!
//! - If the minimums alone exceed the budget, every section gets its minimum
//!   and the total overshoots. Blanking the sign would be worse.
//! - If the maximums cannot absorb the budget, rows keep going to the
//!   cheapest sections past their maximum, so the total stays exact.

use headway_protocol::Section;

/// Sizing inputs for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionSize {
    /// Number of content rows in the section.
    pub row_count: usize,
    /// Rows shown when the section pages its overflow, if it does.
    pub paging_visible_rows: Option<usize>,
    /// Fewest rows the section may be given.
    pub min: usize,
    /// Most rows the section should be given, if capped.
    pub max: Option<usize>,
}

impl SectionSize {
    /// Creates an unbounded, non-paging size for `row_count` rows.
    #[must_use]
    pub const fn new(row_count: usize) -> Self {
        Self {
            row_count,
            paging_visible_rows: None,
            min: 0,
            max: None,
        }
    }

    /// Enables paging with `visible` rows shown at a time.
    #[must_use]
    pub const fn with_paging(mut self, visible: usize) -> Self {
        self.paging_visible_rows = Some(visible);
        self
    }

    /// Sets the row bounds.
    #[must_use]
    pub const fn with_bounds(mut self, min: usize, max: Option<usize>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Derives sizing inputs from a payload section.
    ///
    /// Sections with a later strip page their overflow and ask for their
    /// preferred size. Layout bounds are read as row bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_fit::SectionSize;
    /// use headway_protocol::{Layout, Section};
    ///
    /// let section = Section::new("s", Layout::new(1, Some(3), Some(5)).with_later(), Vec::new());
    /// let size = SectionSize::from_section(&section);
    /// assert_eq!(size.paging_visible_rows, Some(3));
    /// assert_eq!(size.max, Some(5));
    /// ```
    #[must_use]
    pub fn from_section(section: &Section) -> Self {
        let layout = &section.layout;
        Self {
            row_count: section.rows.len(),
            paging_visible_rows: layout.include_later.then(|| layout.trim_floor()),
            min: layout.min,
            max: layout.max,
        }
    }

    /// Returns `true` if the section has no content rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Returns the size the section would take with unlimited room.
    #[must_use]
    pub fn natural_size(&self) -> usize {
        match self.paging_visible_rows {
            Some(visible) => visible.min(self.row_count),
            None => self.row_count,
        }
    }
}

/// Splits `total_rows` across `sections`, one count per section in order.
///
/// Empty sections always receive exactly one row for a placeholder.
///
/// # Examples
///
/// ```
/// use headway_fit::{SectionSize, assign_sizes};
///
/// let sections = [
///     SectionSize::new(6).with_bounds(1, Some(5)),
///     SectionSize::new(4).with_bounds(1, Some(3)),
///     SectionSize::new(2).with_bounds(2, Some(2)),
/// ];
/// assert_eq!(assign_sizes(&sections, 7), vec![3, 2, 2]);
///
/// // Empty sections get a placeholder row.
/// let sections = [SectionSize::new(0), SectionSize::new(3)];
/// assert_eq!(assign_sizes(&sections, 4), vec![1, 3]);
/// ```
#[must_use]
pub fn assign_sizes(sections: &[SectionSize], total_rows: usize) -> Vec<usize> {
    let num_empty = sections.iter().filter(|s| s.is_empty()).count();
    let budget = total_rows.saturating_sub(num_empty);

    let active: Vec<&SectionSize> = sections.iter().filter(|s| !s.is_empty()).collect();
    let natural_sum: usize = active.iter().map(|s| s.natural_size()).sum();
    let targets: Vec<f64> = active
        .iter()
        .map(|s| {
            if natural_sum == 0 {
                0.0
            } else {
                s.natural_size() as f64 * budget as f64 / natural_sum as f64
            }
        })
        .collect();

    let mut counts = round_to_budget(&active, &targets, budget).into_iter();
    sections
        .iter()
        .map(|s| {
            if s.is_empty() {
                1
            } else {
                counts.next().unwrap_or(s.min)
            }
        })
        .collect()
}

/// Rounds `targets` to integers summing to `budget` within each section's
/// bounds, minimizing total absolute deviation.
fn round_to_budget(sections: &[&SectionSize], targets: &[f64], budget: usize) -> Vec<usize> {
    let mut counts: Vec<usize> = sections.iter().map(|s| s.min).collect();
    let floor_sum: usize = counts.iter().sum();
    if sections.is_empty() || floor_sum >= budget {
        return counts;
    }

    for _ in floor_sum..budget {
        let below_cap = cheapest(&counts, targets, |i| {
            sections[i].max.is_none_or(|max| counts[i] < max)
        });
        let Some(i) = below_cap.or_else(|| cheapest(&counts, targets, |_| true)) else {
            break;
        };
        counts[i] += 1;
    }
    counts
}

/// Returns the eligible index whose next unit adds the least deviation.
fn cheapest(counts: &[usize], targets: &[f64], eligible: impl Fn(usize) -> bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, (&k, &t)) in counts.iter().zip(targets).enumerate() {
        if !eligible(i) {
            continue;
        }
        let cost = marginal_cost(k, t);
        if best.is_none_or(|(_, c)| cost < c) {
            best = Some((i, cost));
        }
    }
    best.map(|(i, _)| i)
}

fn marginal_cost(count: usize, target: f64) -> f64 {
    let k = count as f64;
    (k + 1.0 - target).abs() - (k - target).abs()
}

/// Total absolute deviation of `counts` from `targets`.
#[cfg(test)]
fn deviation(counts: &[usize], targets: &[f64]) -> f64 {
    counts
        .iter()
        .zip(targets)
        .map(|(&k, &t)| (k as f64 - t).abs())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use headway_protocol::{DepartureRow, Layout, Row, TimeEntry};

    #[test]
    fn bounded_sections() {
        let sections = [
            SectionSize::new(6).with_bounds(1, Some(5)),
            SectionSize::new(4).with_bounds(1, Some(3)),
            SectionSize::new(2).with_bounds(2, Some(2)),
        ];
        let sizes = assign_sizes(&sections, 7);
        insta::assert_snapshot!(format!("{sizes:?}"), @"[3, 2, 2]");
    }

    #[test]
    fn proportional_without_bounds() {
        let sections = [SectionSize::new(6), SectionSize::new(3), SectionSize::new(3)];
        assert_eq!(assign_sizes(&sections, 8), vec![4, 2, 2]);
    }

    #[test]
    fn all_empty_sections_get_one_row() {
        let sections = [SectionSize::new(0), SectionSize::new(0)];
        assert_eq!(assign_sizes(&sections, 10), vec![1, 1]);
        assert_eq!(assign_sizes(&[], 10), Vec::<usize>::new());
    }

    #[test]
    fn empty_section_keeps_position() {
        let sections = [SectionSize::new(2), SectionSize::new(0), SectionSize::new(2)];
        assert_eq!(assign_sizes(&sections, 5), vec![2, 1, 2]);
    }

    #[test]
    fn minimums_saturate_when_budget_is_short() {
        let sections = [
            SectionSize::new(5).with_bounds(3, None),
            SectionSize::new(5).with_bounds(3, None),
        ];
        assert_eq!(assign_sizes(&sections, 4), vec![3, 3]);
    }

    #[test]
    fn exactness_wins_over_max() {
        let sections = [
            SectionSize::new(2).with_bounds(0, Some(2)),
            SectionSize::new(2).with_bounds(0, Some(2)),
        ];
        let sizes = assign_sizes(&sections, 6);
        assert_eq!(sizes.iter().sum::<usize>(), 6);
        assert_eq!(sizes, vec![3, 3]);
    }

    #[test]
    fn ties_go_to_earlier_section() {
        let sections = [SectionSize::new(1), SectionSize::new(1)];
        assert_eq!(assign_sizes(&sections, 1), vec![1, 0]);
    }

    #[test]
    fn paging_sections_ask_for_visible_rows() {
        let sections = [SectionSize::new(10).with_paging(2), SectionSize::new(2)];
        assert_eq!(assign_sizes(&sections, 4), vec![2, 2]);
    }

    #[test]
    fn from_section_reads_layout() {
        let rows: Vec<Row> = (0..4)
            .map(|i| DepartureRow::new(format!("r{i}"), "1", "Downtown", vec![TimeEntry::minutes(i)]).into())
            .collect();
        let section = Section::new("s", Layout::new(2, None, Some(6)), rows);
        let size = SectionSize::from_section(&section);
        assert_eq!(size, SectionSize::new(4).with_bounds(2, Some(6)));
        assert_eq!(size.natural_size(), 4);
    }
}
