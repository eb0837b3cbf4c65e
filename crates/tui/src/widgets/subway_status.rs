//! Per-line subway status.
//!
//! Fitted vertically. When the full statuses do not fit, the abbreviated
//! ones are tried, and finally all lines running normally are folded into a
//! single "Normal service" row.

use std::time::Instant;

use headway_fit::{Axis, Epoch, FitSession, IdentityToken, NodeRef, Pass, StepResolver};
use headway_protocol::{LineStatus, SubwayStatusWidget, WidgetData};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::Block,
};

use super::{DIM, HEADING, Region, framed, inner_area, paint_into};

const NORMAL: Style = Style::new().fg(Color::Green);
const DISRUPTED: Style = Style::new().fg(Color::Yellow);

/// Presentation variants of the status list, most detailed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubwayStep {
    /// Every line with its full status.
    Full,
    /// Every line with its abbreviated status.
    Abbreviated,
    /// Disrupted lines abbreviated, normal lines folded into one row.
    Collapsed,
}

fn status_line(line: &LineStatus, status: &str) -> Line<'static> {
    let style = if line.normal { NORMAL } else { DISRUPTED };
    Line::from(vec![
        Span::styled(format!("{}: ", line.line), HEADING),
        Span::styled(status.to_string(), style),
    ])
}

fn short_status(line: &LineStatus) -> &str {
    line.status_abbrev.as_deref().unwrap_or(&line.status)
}

/// Returns the status lines at `step`.
///
/// # Examples
///
/// ```
/// use headway_protocol::dummy::dummy_screen;
/// use headway_protocol::WidgetData;
/// use headway_tui::widgets::subway_status::status_text;
/// use headway_tui::widgets::SubwayStep;
///
/// let screen = dummy_screen();
/// let WidgetData::SubwayStatus(subway) = &screen.widgets[2] else { unreachable!() };
///
/// let collapsed = status_text(subway, SubwayStep::Collapsed);
/// assert_eq!(collapsed.lines.len(), 3);
/// assert_eq!(collapsed.lines[2].to_string(), "Normal service: Orange, Blue");
/// ```
#[must_use]
pub fn status_text(widget: &SubwayStatusWidget, step: SubwayStep) -> Text<'static> {
    let lines: Vec<Line<'static>> = match step {
        SubwayStep::Full => widget
            .lines
            .iter()
            .map(|line| status_line(line, &line.status))
            .collect(),
        SubwayStep::Abbreviated => widget
            .lines
            .iter()
            .map(|line| status_line(line, short_status(line)))
            .collect(),
        SubwayStep::Collapsed => {
            let (normal, disrupted): (Vec<_>, Vec<_>) =
                widget.lines.iter().partition(|line| line.normal);
            let mut lines: Vec<_> = disrupted
                .into_iter()
                .map(|line| status_line(line, short_status(line)))
                .collect();
            if !normal.is_empty() {
                let names: Vec<&str> = normal.iter().map(|line| line.line.as_str()).collect();
                lines.push(Line::from(vec![
                    Span::styled("Normal service: ", HEADING),
                    Span::styled(names.join(", "), NORMAL),
                ]));
            }
            lines
        }
    };
    Text::from(lines)
}

/// Region state for a subway status widget.
#[derive(Debug)]
pub struct SubwayStatusRegion {
    node: NodeRef,
    resolver: StepResolver<SubwayStep>,
}

impl Default for SubwayStatusRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl SubwayStatusRegion {
    /// Creates a region at its most detailed step.
    #[must_use]
    pub fn new() -> Self {
        Self {
            node: NodeRef::new(),
            resolver: StepResolver::fixed(
                [SubwayStep::Full, SubwayStep::Abbreviated, SubwayStep::Collapsed],
                Axis::Y,
            ),
        }
    }

    /// Returns the current step.
    #[must_use]
    pub fn step(&self) -> SubwayStep {
        *self.resolver.step()
    }
}

impl Region for SubwayStatusRegion {
    fn label(&self) -> &'static str {
        "subway_status"
    }

    fn sync(&mut self, _widget: &WidgetData, area: Rect, epoch: Epoch, _now: Instant) {
        self.resolver
            .sync(IdentityToken::of(epoch, &inner_area(area)));
    }

    fn render(&self, widget: &WidgetData, area: Rect, buf: &mut Buffer) {
        let WidgetData::SubwayStatus(subway) = widget else {
            return;
        };
        let inner = framed(Block::bordered().title(" Subway "), area, buf);

        let text = if subway.lines.is_empty() {
            Text::from(Line::styled("No status available", DIM))
        } else {
            status_text(subway, self.step())
        };
        paint_into(&self.node, text, inner, true, buf);
    }

    fn after_paint(&mut self, _now: Instant) -> Pass {
        self.resolver.after_paint(&self.node)
    }
}
