//! Departure sections, rows, and layout policy.
//!
//! A [`Section`] is a named group of rows rendered together (for instance
//! "Northbound" or "Route 1"). Each section carries a [`Layout`] policy that
//! tells the fitting engine how many rows it would like to show and how far
//! it may be shrunk when the sign runs out of space.
//!
//! Departure rows are not atomic: their list of [`TimeEntry`] values can be
//! trimmed one entry at a time before the row disappears entirely.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Per-section bounds guiding allocation and trimming.
///
/// - `min`: the section never shrinks below this many time entries while
///   other sections can still give up space
/// - `base`: the preferred size; trimming first brings sections down to it
/// - `max`: a hard ceiling, enforced before anything else is trimmed
/// - `include_later`: whether trimmed content is shown in a paged
///   "later departures" strip
///
/// # Examples
///
/// ```
/// use headway_protocol::Layout;
///
/// let layout: Layout = serde_json::from_str(r#"{"min": 2, "max": 6}"#).unwrap();
/// assert_eq!(layout.min, 2);
/// assert_eq!(layout.base, None);
/// assert_eq!(layout.trim_floor(), 2);
/// assert!(!layout.include_later);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    /// Minimum number of time entries.
    #[serde(default = "default_min")]
    pub min: usize,
    /// Preferred number of time entries, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<usize>,
    /// Maximum number of time entries, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    /// Whether trimmed rows are shown in a paged overflow strip.
    #[serde(default)]
    pub include_later: bool,
}

fn default_min() -> usize {
    1
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            min: default_min(),
            base: None,
            max: None,
            include_later: false,
        }
    }
}

impl Layout {
    /// Creates a layout with the given bounds and no later strip.
    #[must_use]
    pub const fn new(min: usize, base: Option<usize>, max: Option<usize>) -> Self {
        Self {
            min,
            base,
            max,
            include_later: false,
        }
    }

    /// Enables the paged "later departures" strip for this layout.
    #[must_use]
    pub const fn with_later(mut self) -> Self {
        self.include_later = true;
        self
    }

    /// Returns the size trimming aims for before touching `min`.
    ///
    /// This is `base` when set, and `min` otherwise.
    #[must_use]
    pub fn trim_floor(&self) -> usize {
        self.base.unwrap_or(self.min)
    }

    /// Validates that `min <= base <= max`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidLayout`] naming the section when the
    /// bounds are out of order.
    pub fn validate(&self, section: &str) -> Result<()> {
        let invalid = |reason: String| ProtocolError::InvalidLayout {
            section: section.to_string(),
            reason,
        };

        if let Some(base) = self.base
            && base < self.min
        {
            return Err(invalid(format!("base {base} is below min {}", self.min)));
        }
        if let Some(max) = self.max {
            if max < self.min {
                return Err(invalid(format!("min {} exceeds max {max}", self.min)));
            }
            if let Some(base) = self.base
                && base > max
            {
                return Err(invalid(format!("base {base} exceeds max {max}")));
            }
        }
        Ok(())
    }
}

/// A single predicted or scheduled departure time.
///
/// Either a number of minutes away or a literal label such as `"BRD"`.
///
/// # Examples
///
/// ```
/// use headway_protocol::TimeEntry;
///
/// assert_eq!(TimeEntry::minutes(0).to_string(), "Now");
/// assert_eq!(TimeEntry::minutes(7).to_string(), "7 min");
/// assert_eq!(TimeEntry::text("BRD").to_string(), "BRD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Minutes until departure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    /// Literal label overriding `minutes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TimeEntry {
    /// Creates a time entry a given number of minutes away.
    #[must_use]
    pub fn minutes(minutes: u32) -> Self {
        Self {
            minutes: Some(minutes),
            text: None,
        }
    }

    /// Creates a time entry with a literal label.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            minutes: None,
            text: Some(text.into()),
        }
    }
}

impl fmt::Display for TimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.text, self.minutes) {
            (Some(text), _) => f.write_str(text),
            (None, Some(0)) => f.write_str("Now"),
            (None, Some(minutes)) => write!(f, "{minutes} min"),
            (None, None) => f.write_str("--"),
        }
    }
}

/// A row showing upcoming departures of one route towards one destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartureRow {
    /// Server-assigned row identifier.
    pub id: String,
    /// Route label (e.g. `"1"`, `"Red"`).
    pub route: String,
    /// Destination shown next to the route.
    pub headsign: String,
    /// Shorter destination for narrow signs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headsign_abbrev: Option<String>,
    /// Upcoming times, soonest first.
    #[serde(default)]
    pub times: Vec<TimeEntry>,
}

impl DepartureRow {
    /// Creates a departure row.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        route: impl Into<String>,
        headsign: impl Into<String>,
        times: Vec<TimeEntry>,
    ) -> Self {
        Self {
            id: id.into(),
            route: route.into(),
            headsign: headsign.into(),
            headsign_abbrev: None,
            times,
        }
    }
}

/// A free-text row (e.g. "Shuttle buses replace service").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoticeRow {
    /// Server-assigned row identifier.
    pub id: String,
    /// The notice text.
    pub text: String,
}

/// A row entry within a [`Section`].
///
/// # Examples
///
/// ```
/// use headway_protocol::Row;
///
/// let row: Row = serde_json::from_str(
///     r#"{"type": "notice_row", "id": "n1", "text": "No service"}"#,
/// ).unwrap();
/// assert_eq!(row.time_count(), 0);
/// assert_eq!(row.id(), "n1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Row {
    /// A row of departure times.
    DepartureRow(DepartureRow),
    /// A free-text notice.
    NoticeRow(NoticeRow),
}

impl Row {
    /// Returns the server-assigned identifier of the row.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::DepartureRow(row) => &row.id,
            Self::NoticeRow(row) => &row.id,
        }
    }

    /// Returns the number of trimmable time entries in the row.
    ///
    /// Notice rows have none.
    #[must_use]
    pub fn time_count(&self) -> usize {
        match self {
            Self::DepartureRow(row) => row.times.len(),
            Self::NoticeRow(_) => 0,
        }
    }

    /// Returns `true` if this is a departure row.
    #[must_use]
    pub const fn is_departure(&self) -> bool {
        matches!(self, Self::DepartureRow(_))
    }
}

impl From<DepartureRow> for Row {
    fn from(row: DepartureRow) -> Self {
        Self::DepartureRow(row)
    }
}

impl From<NoticeRow> for Row {
    fn from(row: NoticeRow) -> Self {
        Self::NoticeRow(row)
    }
}

/// A named group of rows with a layout policy.
///
/// # Examples
///
/// ```
/// use headway_protocol::{DepartureRow, Layout, Section, TimeEntry};
///
/// let section = Section::new("s1", Layout::default(), vec![
///     DepartureRow::new("r1", "1", "Harvard", vec![TimeEntry::minutes(2), TimeEntry::minutes(9)]).into(),
///     DepartureRow::new("r2", "47", "Central", vec![TimeEntry::minutes(4)]).into(),
/// ]);
/// assert_eq!(section.time_entry_count(), 3);
/// assert!(!section.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Section {
    /// Server-assigned section identifier.
    pub id: String,
    /// Optional heading shown above the rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Layout policy.
    #[serde(default)]
    pub layout: Layout,
    /// Rows in display order.
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Section {
    /// Creates an unnamed section.
    #[must_use]
    pub fn new(id: impl Into<String>, layout: Layout, rows: Vec<Row>) -> Self {
        Self {
            id: id.into(),
            name: None,
            layout,
            rows,
        }
    }

    /// Returns the total number of time entries across departure rows.
    #[must_use]
    pub fn time_entry_count(&self) -> usize {
        self.rows.iter().map(Row::time_count).sum()
    }

    /// Returns `true` if the section has no rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departure(id: &str, minutes: &[u32]) -> Row {
        DepartureRow::new(
            id,
            "1",
            "Harvard",
            minutes.iter().copied().map(TimeEntry::minutes).collect(),
        )
        .into()
    }

    #[test]
    fn layout_defaults() {
        let layout: Layout = serde_json::from_str("{}").unwrap();
        assert_eq!(layout, Layout::default());
        assert_eq!(layout.min, 1);
    }

    #[test]
    fn layout_trim_floor_prefers_base() {
        assert_eq!(Layout::new(2, Some(4), Some(6)).trim_floor(), 4);
        assert_eq!(Layout::new(2, None, Some(6)).trim_floor(), 2);
    }

    #[test]
    fn layout_validate() {
        assert!(Layout::new(2, Some(4), Some(6)).validate("s").is_ok());
        assert!(Layout::new(2, None, None).validate("s").is_ok());
        assert!(Layout::new(3, None, Some(2)).validate("s").is_err());
        assert!(Layout::new(3, Some(2), None).validate("s").is_err());
        assert!(Layout::new(1, Some(5), Some(4)).validate("s").is_err());
    }

    #[test]
    fn row_tags_are_snake_case() {
        let json = serde_json::to_string(&departure("r1", &[1])).unwrap();
        assert!(json.contains(r#""type":"departure_row""#));
    }

    #[test]
    fn notice_rows_do_not_count_as_entries() {
        let section = Section::new(
            "s",
            Layout::default(),
            vec![
                departure("r1", &[1, 5]),
                NoticeRow {
                    id: "n".to_string(),
                    text: "Detour".to_string(),
                }
                .into(),
            ],
        );
        assert_eq!(section.time_entry_count(), 2);
    }

    #[test]
    fn time_entry_display() {
        let empty = TimeEntry {
            minutes: None,
            text: None,
        };
        assert_eq!(empty.to_string(), "--");
        assert_eq!(TimeEntry::minutes(12).to_string(), "12 min");
        assert_eq!(
            TimeEntry {
                minutes: Some(3),
                text: Some("BRD".to_string()),
            }
            .to_string(),
            "BRD"
        );
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn arb_row()(
            id in "[a-z]{1,6}",
            notice in any::<bool>(),
            minutes in prop::collection::vec(0u32..90, 0..5),
        ) -> Row {
            if notice {
                NoticeRow { id, text: "Notice".to_string() }.into()
            } else {
                DepartureRow::new(id, "1", "Downtown", minutes.into_iter().map(TimeEntry::minutes).collect()).into()
            }
        }
    }

    proptest! {
        /// The section entry count is the sum of its departure rows' times.
        #[test]
        fn entry_count_sums_departure_times(rows in prop::collection::vec(arb_row(), 0..8)) {
            let expected: usize = rows
                .iter()
                .map(|row| match row {
                    Row::DepartureRow(d) => d.times.len(),
                    Row::NoticeRow(_) => 0,
                })
                .sum();
            let section = Section::new("s", Layout::default(), rows);
            prop_assert_eq!(section.time_entry_count(), expected);
        }

        /// Sections survive a JSON round trip unchanged.
        #[test]
        fn section_roundtrip(rows in prop::collection::vec(arb_row(), 0..8)) {
            let section = Section::new("s", Layout::new(1, Some(2), Some(4)).with_later(), rows);
            let json = serde_json::to_string(&section).expect("serialize");
            let parsed: Section = serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(section, parsed);
        }
    }
}
