//! The header bar: station name and clock.
//!
//! The header is fitted horizontally. Its steps drop detail from the right:
//! first the full name gives way to the abbreviated one, then the clock goes.

use headway_fit::{Axis, Epoch, FitSession, IdentityToken, NodeRef, Pass, StepResolver};
use headway_protocol::HeaderData;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Block,
};

use super::{DIM, framed, inner_area, paint_into};

const TITLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const STALE: Style = Style::new().fg(Color::Yellow);

/// Presentation variants of the header, most detailed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderStep {
    /// Full title and clock.
    Full,
    /// Abbreviated title and clock.
    Abbreviated,
    /// Abbreviated title alone.
    TitleOnly,
}

/// Everything the header shows.
#[derive(Debug, Clone, Copy)]
pub struct HeaderView<'a> {
    /// Title content from the payload.
    pub header: &'a HeaderData,
    /// Current time, already formatted.
    pub clock: &'a str,
    /// Whether the last update failed.
    pub stale: bool,
    /// Most recent error, for the status line.
    pub status: Option<&'a str>,
}

impl HeaderView<'_> {
    /// Returns the header line at `step`.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_protocol::HeaderData;
    /// use headway_tui::widgets::{HeaderStep, HeaderView};
    ///
    /// let header = HeaderData { title: "Park Street".into(), title_abbrev: Some("Park".into()) };
    /// let view = HeaderView { header: &header, clock: "09:41", stale: false, status: None };
    ///
    /// assert_eq!(view.line(HeaderStep::Full).to_string(), "Park Street  09:41");
    /// assert_eq!(view.line(HeaderStep::TitleOnly).to_string(), "Park");
    /// ```
    #[must_use]
    pub fn line(&self, step: HeaderStep) -> Line<'static> {
        let (title, clock) = match step {
            HeaderStep::Full => (self.header.title.as_str(), true),
            HeaderStep::Abbreviated => (self.header.short_title(), true),
            HeaderStep::TitleOnly => (self.header.short_title(), false),
        };

        let mut spans = vec![Span::styled(title.to_string(), TITLE)];
        if clock && !self.clock.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::raw(self.clock.to_string()));
        }
        Line::from(spans)
    }
}

/// Region state for the header bar.
#[derive(Debug)]
pub struct HeaderRegion {
    node: NodeRef,
    resolver: StepResolver<HeaderStep>,
}

impl Default for HeaderRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderRegion {
    /// Creates a header region at its most detailed step.
    #[must_use]
    pub fn new() -> Self {
        Self {
            node: NodeRef::new(),
            resolver: StepResolver::fixed(
                [HeaderStep::Full, HeaderStep::Abbreviated, HeaderStep::TitleOnly],
                Axis::X,
            ),
        }
    }

    /// Returns the current step.
    #[must_use]
    pub fn step(&self) -> HeaderStep {
        *self.resolver.step()
    }

    /// Binds the header to `view` painted into `area` during `epoch`.
    pub fn sync(&mut self, view: &HeaderView<'_>, area: Rect, epoch: Epoch) {
        let inner = inner_area(area);
        self.resolver
            .sync(IdentityToken::of(epoch, &(inner, view.clock.len())));
    }

    /// Paints the header at its current step.
    pub fn render(&self, view: &HeaderView<'_>, area: Rect, buf: &mut Buffer) {
        let mut block = Block::bordered();
        if view.stale {
            block = block.title_top(Line::styled(" stale ", STALE).right_aligned());
        }
        if let Some(status) = view.status {
            block = block.title_bottom(Line::styled(format!(" {status} "), DIM));
        }
        let inner = framed(block, area, buf);

        paint_into(&self.node, view.line(self.step()).into(), inner, false, buf);
    }

    /// Measures the last render and advances at most one step.
    pub fn after_paint(&mut self) -> Pass {
        self.resolver.after_paint(&self.node)
    }
}
