//! Fitted regions of the sign.
//!
//! Every widget slot on the screen is backed by a [`Region`]: a small state
//! machine that owns the fitting session for that slot (a step resolver, a
//! trim session, carousels) and knows how to paint the slot at its current
//! state.
//!
//! # Render Cycle
//!
//! The app drives regions through a two-phase cycle:
//!
//! 1. [`Region::sync`] binds the region to the current payload and area,
//!    resetting its session when the identity token changes.
//! 2. [`Region::render`] paints the current state. This is a pure pass: it
//!    only attaches measurements to the region's node.
//! 3. [`Region::after_paint`] measures the node and applies at most one
//!    change.
//!
//! The cycle repeats until no region reports [`Pass::Changed`].
//!
//! # Modules
//!
//! - [`header`]: Station name and clock, fitted horizontally
//! - [`departures`]: Departure sections, allocated and trimmed vertically
//! - [`later`]: The paged strip of trimmed departures
//! - [`alert`]: Alert card, one alert at a time
//! - [`subway_status`]: Per-line subway status
//! - [`registry`]: Maps widget kinds to region strategies

use std::fmt;
use std::time::Instant;

use headway_fit::{Epoch, NodeRef, Pass};
use headway_protocol::WidgetData;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::paint::paint;

pub mod alert;
pub mod departures;
pub mod header;
pub mod later;
pub mod registry;
pub mod subway_status;

// Re-export primary types for convenience
pub use alert::{AlertRegion, AlertStep};
pub use departures::{DeparturesRegion, fold_sections};
pub use header::{HeaderRegion, HeaderStep, HeaderView};
pub use registry::{Registry, Strategy};
pub use subway_status::{SubwayStatusRegion, SubwayStep};

/// One fitted slot on the screen.
pub trait Region: fmt::Debug {
    /// Short name used in logs and error signatures.
    fn label(&self) -> &'static str;

    /// Binds the region to `widget` painted into `area` during `epoch`.
    fn sync(&mut self, widget: &WidgetData, area: Rect, epoch: Epoch, now: Instant);

    /// Paints the region at its current state.
    fn render(&self, widget: &WidgetData, area: Rect, buf: &mut Buffer);

    /// Measures the last render and applies at most one change.
    fn after_paint(&mut self, now: Instant) -> Pass;

    /// Advances carousels. Returns `true` if the region must be redrawn.
    fn tick(&mut self, _now: Instant) -> bool {
        false
    }

    /// Returns when the region next needs a [`tick`](Self::tick).
    fn next_deadline(&self) -> Option<Instant> {
        None
    }
}

/// Style for secondary text.
pub(crate) const DIM: Style = Style::new().fg(Color::DarkGray);

/// Style for headings.
pub(crate) const HEADING: Style = Style::new().add_modifier(Modifier::BOLD);

/// Draws the rounded frame shared by all regions and returns its inner area.
pub(crate) fn framed(block: Block<'_>, area: Rect, buf: &mut Buffer) -> Rect {
    let block = block.border_type(BorderType::Rounded);
    let inner = block.inner(area);
    block.render(area, buf);
    inner
}

/// Returns the inner area of a region's frame.
pub(crate) fn inner_area(area: Rect) -> Rect {
    Block::bordered().inner(area)
}

/// Paints `text` into `inner` and attaches the measurement to `node`.
///
/// An empty area detaches the node, so the region's session settles instead
/// of trimming against a zero-sized box.
pub(crate) fn paint_into(node: &NodeRef, text: Text<'_>, inner: Rect, wrap: bool, buf: &mut Buffer) {
    if inner.is_empty() {
        node.detach();
        return;
    }
    node.attach(paint(text, inner, wrap, buf));
}

/// A region with nothing to fit.
///
/// Renders a placeholder widget's caption, and stands in for any widget kind
/// the registry has no strategy for.
#[derive(Debug, Default)]
pub struct PlaceholderRegion;

impl Region for PlaceholderRegion {
    fn label(&self) -> &'static str {
        "placeholder"
    }

    fn sync(&mut self, _widget: &WidgetData, _area: Rect, _epoch: Epoch, _now: Instant) {}

    fn render(&self, widget: &WidgetData, area: Rect, buf: &mut Buffer) {
        let inner = framed(Block::bordered().border_style(DIM), area, buf);
        let caption = match widget {
            WidgetData::Placeholder { text: Some(text) } => text.as_str(),
            _ => "",
        };
        Paragraph::new(Line::styled(caption, DIM))
            .alignment(Alignment::Center)
            .render(inner, buf);
    }

    fn after_paint(&mut self, _now: Instant) -> Pass {
        Pass::Settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use headway_fit::Measure;

    #[test]
    fn empty_area_detaches_node() {
        let node = NodeRef::new();
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 2));
        paint_into(&node, Text::from("x"), Rect::new(0, 0, 10, 2), false, &mut buf);
        assert!(node.is_attached());

        paint_into(&node, Text::from("x"), Rect::new(0, 0, 0, 0), false, &mut buf);
        assert!(!node.is_attached());
        assert_eq!(node.metrics(), None);
    }

    #[test]
    fn placeholder_renders_caption() {
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        let widget = WidgetData::Placeholder {
            text: Some("Ad".to_string()),
        };

        let mut region = PlaceholderRegion;
        region.render(&widget, area, &mut buf);
        assert_eq!(region.after_paint(Instant::now()), Pass::Settled);
        insta::assert_snapshot!(buffer_to_string(&buf), @r"
        ╭──────────╮
        │    Ad    │
        ╰──────────╯
        ");
    }
}
