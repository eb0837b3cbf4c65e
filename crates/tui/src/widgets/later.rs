//! The "later departures" strip.
//!
//! Rows trimmed off a section that opts into `include_later` are not lost:
//! they are shown a page at a time under the section, cycling on a
//! [`TickedIndex`](headway_fit::TickedIndex). Each page keeps the same
//! height, so flipping pages never changes the section's measured size.

use headway_protocol::Row;
use ratatui::text::{Line, Span};

use super::departures::row_line;
use super::{DIM, HEADING};

/// Rows shown per page.
pub const LATER_PAGE_ROWS: usize = 2;

/// Returns how many pages `rows` rows need.
///
/// # Examples
///
/// ```
/// use headway_tui::widgets::later::page_count;
///
/// assert_eq!(page_count(0), 0);
/// assert_eq!(page_count(3), 2);
/// ```
#[must_use]
pub const fn page_count(rows: usize) -> usize {
    rows.div_ceil(LATER_PAGE_ROWS)
}

/// Returns the page indicator, one dot per page.
#[must_use]
pub fn page_dots(num_pages: usize, page: usize) -> String {
    (0..num_pages)
        .map(|i| if i == page { '●' } else { '○' })
        .collect()
}

/// Returns the lines of page `page` over `rows`, laid out for `width`
/// columns: a label line followed by exactly [`LATER_PAGE_ROWS`] row lines.
#[must_use]
pub fn strip_lines(rows: &[Row], page: usize, width: u16) -> Vec<Line<'static>> {
    let num_pages = page_count(rows.len());
    let mut label = vec![Span::styled("Later", HEADING)];
    if num_pages > 1 {
        label.push(Span::raw(" "));
        label.push(Span::styled(page_dots(num_pages, page), DIM));
    }

    let mut lines = Vec::with_capacity(LATER_PAGE_ROWS + 1);
    lines.push(Line::from(label));
    lines.extend(
        rows.iter()
            .skip(page * LATER_PAGE_ROWS)
            .take(LATER_PAGE_ROWS)
            .map(|row| row_line(row, width)),
    );
    lines.resize(LATER_PAGE_ROWS + 1, Line::default());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use headway_protocol::{DepartureRow, TimeEntry};

    fn rows(n: u32) -> Vec<Row> {
        (0..n)
            .map(|i| {
                DepartureRow::new(format!("r{i}"), "1", format!("Stop {i}"), vec![TimeEntry::minutes(i)])
                    .into()
            })
            .collect()
    }

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn dots_mark_current_page() {
        assert_eq!(page_dots(3, 1), "○●○");
        assert_eq!(page_dots(0, 0), "");
    }

    #[test]
    fn pages_keep_constant_height() {
        let rows = rows(3);
        assert_eq!(strip_lines(&rows, 0, 40).len(), LATER_PAGE_ROWS + 1);
        // The last page holds one row and one blank line.
        let last = strip_lines(&rows, 1, 40);
        assert_eq!(last.len(), LATER_PAGE_ROWS + 1);
        assert_eq!(last[2].width(), 0);
    }

    #[test]
    fn label_shows_dots_only_when_paging() {
        let single = strip_lines(&rows(2), 0, 40);
        assert_eq!(single[0].to_string(), "Later");

        let paged = strip_lines(&rows(5), 2, 40);
        assert_eq!(paged[0].to_string(), "Later ○○●");
        assert!(text(&paged)[1].contains("Stop 4"));
    }
}
