//! Off-screen painting and measurement.
//!
//! This is where the fitting engine gets its measurements. [`paint`] renders
//! text into the visible buffer (clipped to its area, as any widget would)
//! and reports the *unclipped* extent of the same text as [`Metrics`], which
//! is what a region attaches to its [`NodeRef`](headway_fit::NodeRef) after
//! each render pass.
//!
//! Wrapped text is laid out in a scratch buffer as wide as the area and
//! taller than it, so the painted height can exceed the client height.

use headway_fit::Metrics;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Text,
    widgets::{Paragraph, Widget, Wrap},
};

/// Upper bound on the height of the scratch buffer.
const MAX_SCRATCH_ROWS: u16 = 1024;

/// Renders `text` into `area` of `buf` and returns its measured extent.
///
/// With `wrap` set, lines are word-wrapped at the area's width and only the
/// height can overflow. Without it, every line takes exactly one row and the
/// widest line sets the scroll width.
///
/// # Examples
///
/// ```
/// use ratatui::{buffer::Buffer, layout::Rect, text::Text};
/// use headway_fit::{Axis, has_overflow};
/// use headway_tui::paint::paint;
///
/// let area = Rect::new(0, 0, 10, 1);
/// let mut buf = Buffer::empty(area);
/// let metrics = paint(Text::from("Harvard Square"), area, false, &mut buf);
///
/// assert_eq!(metrics.scroll_width, 14);
/// assert!(has_overflow(&metrics, Axis::X));
/// ```
pub fn paint(text: Text<'_>, area: Rect, wrap: bool, buf: &mut Buffer) -> Metrics {
    let (scroll_width, scroll_height) = if wrap {
        measure_wrapped(&text, area)
    } else {
        (saturate(text.width()), saturate(text.height()))
    };

    let mut paragraph = Paragraph::new(text);
    if wrap {
        paragraph = paragraph.wrap(Wrap { trim: false });
    }
    paragraph.render(area, buf);

    Metrics::new(scroll_width, scroll_height, area.width, area.height)
}

/// Lays `text` out in a scratch buffer and returns the painted extent.
fn measure_wrapped(text: &Text<'_>, area: Rect) -> (u16, u16) {
    if area.width == 0 {
        return (saturate(text.width()), saturate(text.height()));
    }

    let scratch_area = Rect::new(0, 0, area.width, scratch_rows(text, area));
    let mut scratch = Buffer::empty(scratch_area);
    Paragraph::new(text.clone())
        .wrap(Wrap { trim: false })
        .render(scratch_area, &mut scratch);

    let mut width = 0;
    let mut height = 0;
    for y in 0..scratch_area.height {
        let painted = (0..scratch_area.width)
            .rev()
            .find(|&x| scratch.cell((x, y)).is_some_and(|cell| cell.symbol() != " "));
        if let Some(x) = painted {
            width = width.max(x + 1);
            height = y + 1;
        }
    }
    (width, height)
}

/// Returns a scratch height that can hold the wrapped text, and is always
/// taller than the area so that overflow is visible.
fn scratch_rows(text: &Text<'_>, area: Rect) -> u16 {
    let width = usize::from(area.width);
    let estimate: usize = text
        .lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    // Word wrapping can leave gaps at line ends; leave room for them.
    let rows = saturate(estimate.saturating_mul(2).saturating_add(1));
    rows.max(area.height.saturating_add(1)).min(MAX_SCRATCH_ROWS)
}

fn saturate(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
