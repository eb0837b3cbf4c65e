//! Test helpers shared by the TUI test modules.

use std::time::Instant;

use headway_config::CarouselConfig;
use headway_fit::{Epoch, Pass};
use headway_protocol::WidgetData;
use ratatui::{buffer::Buffer, layout::Rect};

use crate::widgets::Region;

/// Upper bound on render passes in [`settle`], far above what any test
/// region needs.
const MAX_TEST_PASSES: usize = 100;

/// Converts a [`Buffer`] to text, one line per row, with trailing spaces
/// trimmed from every row.
#[must_use]
pub(crate) fn buffer_to_string(buf: &Buffer) -> String {
    let mut result = String::new();
    for y in buf.area.top()..buf.area.bottom() {
        let start = result.len();
        for x in buf.area.left()..buf.area.right() {
            if let Some(cell) = buf.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        let trimmed = result[start..].trim_end_matches(' ').len();
        result.truncate(start + trimmed);
        result.push('\n');
    }
    result
}

/// Carousel settings with short, round intervals.
#[must_use]
pub(crate) fn test_cadence() -> CarouselConfig {
    CarouselConfig {
        page_interval_ms: 1000,
        max_page_duration_ms: 2000,
        total_cycle_ms: 6000,
    }
}

/// Runs the render and measure cycle on one region until it stops changing.
///
/// Returns the buffer of the last render, which is the settled one, and the
/// outcome of every pass.
pub(crate) fn settle(
    region: &mut dyn Region,
    widget: &WidgetData,
    area: Rect,
    now: Instant,
) -> (Buffer, Vec<Pass>) {
    let epoch = Epoch::ZERO.next();
    let mut passes = Vec::new();
    loop {
        region.sync(widget, area, epoch, now);
        let mut buf = Buffer::empty(area);
        region.render(widget, area, &mut buf);
        let pass = region.after_paint(now);
        passes.push(pass);
        if !pass.needs_render() || passes.len() >= MAX_TEST_PASSES {
            return (buf, passes);
        }
    }
}
