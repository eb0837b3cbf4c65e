//! The alert card.
//!
//! Alerts are shown one at a time. The card pages through them once per
//! payload and then holds the last one until the next payload restarts it.
//! Every alert is fitted vertically on its own: the identity token carries
//! the alert id, so flipping to the next alert starts over from the full
//! text.

use std::time::Instant;

use headway_config::CarouselConfig;
use headway_fit::{
    Axis, CarouselMode, Epoch, FitSession, IdentityToken, NodeRef, Pass, StepResolver, Tick,
    TickedIndex,
};
use headway_protocol::{Alert, AlertWidget, WidgetData};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::Block,
};
use tracing::debug;

use super::{DIM, Region, framed, inner_area, paint_into};

const ALERT_HEADER: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

/// Presentation variants of an alert, most detailed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertStep {
    /// Header and full body.
    Full,
    /// Header and abbreviated body.
    Abbreviated,
    /// Header alone.
    HeaderOnly,
}

/// Returns the lines of `alert` at `step`.
#[must_use]
pub fn alert_text(alert: &Alert, step: AlertStep) -> Text<'static> {
    let header = Line::styled(alert.header.clone(), ALERT_HEADER);
    let body = match step {
        AlertStep::Full => Some(alert.body.as_str()),
        AlertStep::Abbreviated => Some(alert.body_abbrev.as_deref().unwrap_or(&alert.body)),
        AlertStep::HeaderOnly => None,
    };

    let mut lines = vec![header];
    if let Some(body) = body.filter(|body| !body.is_empty()) {
        lines.push(Line::raw(body.to_string()));
    }
    Text::from(lines)
}

/// Region state for an alert widget.
#[derive(Debug)]
pub struct AlertRegion {
    node: NodeRef,
    resolver: StepResolver<AlertStep>,
    pages: TickedIndex,
    epoch: Option<Epoch>,
}

impl AlertRegion {
    /// Creates a region that shows each alert for the page interval of
    /// `cadence`.
    #[must_use]
    pub fn new(cadence: &CarouselConfig) -> Self {
        Self {
            node: NodeRef::new(),
            resolver: StepResolver::fixed(
                [AlertStep::Full, AlertStep::Abbreviated, AlertStep::HeaderOnly],
                Axis::Y,
            ),
            pages: TickedIndex::new(0, cadence.page_interval(), CarouselMode::Once),
            epoch: None,
        }
    }

    /// Returns the current step.
    #[must_use]
    pub fn step(&self) -> AlertStep {
        *self.resolver.step()
    }

    /// Returns the index of the alert on display.
    #[must_use]
    pub const fn page_index(&self) -> usize {
        self.pages.page_index()
    }

    /// Returns `true` once every alert has been shown.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.pages.is_completed()
    }

    fn current<'a>(&self, widget: &'a AlertWidget) -> Option<&'a Alert> {
        widget.alerts.get(self.pages.page_index())
    }
}

impl Region for AlertRegion {
    fn label(&self) -> &'static str {
        "alert"
    }

    fn sync(&mut self, widget: &WidgetData, area: Rect, epoch: Epoch, now: Instant) {
        let WidgetData::Alert(alerts) = widget else {
            return;
        };
        if self.epoch != Some(epoch) {
            self.epoch = Some(epoch);
            self.pages.restart(alerts.alerts.len(), now);
        }

        let id = self.current(alerts).map(|alert| alert.id.as_str());
        self.resolver
            .sync(IdentityToken::of(epoch, &(id, inner_area(area))));
    }

    fn render(&self, widget: &WidgetData, area: Rect, buf: &mut Buffer) {
        let WidgetData::Alert(alerts) = widget else {
            return;
        };
        let count = alerts.alerts.len();
        let title = if count > 1 {
            format!(" Alert {}/{count} ", self.pages.page_index() + 1)
        } else {
            " Alert ".to_string()
        };
        let inner = framed(Block::bordered().title(title), area, buf);

        let text = match self.current(alerts) {
            Some(alert) => alert_text(alert, self.step()),
            None => Text::from(Line::styled("No alerts", DIM)),
        };
        paint_into(&self.node, text, inner, true, buf);
    }

    fn after_paint(&mut self, _now: Instant) -> Pass {
        self.resolver.after_paint(&self.node)
    }

    fn tick(&mut self, now: Instant) -> bool {
        match self.pages.tick(now) {
            Tick::Idle => false,
            Tick::Advanced => true,
            Tick::Completed => {
                debug!(alerts = self.pages.num_pages(), "alert carousel completed");
                true
            }
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.pages.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, settle, test_cadence};
    use headway_protocol::dummy::dummy_screen;
    use std::time::Duration;

    fn dummy_alerts() -> WidgetData {
        dummy_screen().widgets[1].clone()
    }

    #[test]
    fn roomy_card_shows_full_alert() {
        let widget = dummy_alerts();
        let mut region = AlertRegion::new(&test_cadence());

        let (buf, passes) = settle(&mut region, &widget, Rect::new(0, 0, 40, 12), Instant::now());
        assert_eq!(passes, vec![Pass::Settled]);
        assert_eq!(region.step(), AlertStep::Full);

        let rendered = buffer_to_string(&buf);
        assert!(rendered.contains(" Alert 1/2 "));
        assert!(rendered.contains("Red Line delays"));
        assert!(rendered.contains("disabled train"));
    }

    #[test]
    fn short_card_abbreviates() {
        let widget = dummy_alerts();
        let mut region = AlertRegion::new(&test_cadence());

        let (buf, passes) = settle(&mut region, &widget, Rect::new(0, 0, 40, 4), Instant::now());
        assert_eq!(passes, vec![Pass::Changed, Pass::Settled]);
        assert!(buffer_to_string(&buf).contains("Up to 20 min delays"));
    }

    #[test]
    fn one_line_card_shows_header_only() {
        let widget = dummy_alerts();
        let mut region = AlertRegion::new(&test_cadence());

        settle(&mut region, &widget, Rect::new(0, 0, 40, 3), Instant::now());
        assert_eq!(region.step(), AlertStep::HeaderOnly);
    }

    #[test]
    fn pages_once_and_refits_each_alert() {
        let widget = dummy_alerts();
        let mut region = AlertRegion::new(&test_cadence());
        let area = Rect::new(0, 0, 40, 3);
        let t0 = Instant::now();
        settle(&mut region, &widget, area, t0);
        assert_eq!(region.next_deadline(), Some(t0 + Duration::from_secs(1)));

        assert!(region.tick(t0 + Duration::from_secs(1)));
        assert_eq!(region.page_index(), 1);
        assert!(region.is_completed());
        assert_eq!(region.next_deadline(), None);

        // The new alert starts from the full text again.
        let (buf, _) = settle(&mut region, &widget, area, t0);
        assert!(buffer_to_string(&buf).contains("Elevator closed"));
        assert!(buffer_to_string(&buf).contains(" Alert 2/2 "));

        assert!(!region.tick(t0 + Duration::from_secs(5)));
        assert_eq!(region.page_index(), 1);
    }

    #[test]
    fn empty_alert_list() {
        let widget = WidgetData::Alert(AlertWidget::default());
        let mut region = AlertRegion::new(&test_cadence());

        let (buf, passes) = settle(&mut region, &widget, Rect::new(0, 0, 20, 3), Instant::now());
        assert_eq!(passes, vec![Pass::Settled]);
        assert!(buffer_to_string(&buf).contains("No alerts"));
        assert_eq!(region.next_deadline(), None);
    }

    #[test]
    fn abbreviated_body_falls_back_to_full_body() {
        let alert = Alert::new("a", "Elevator closed", "Use the ramp");
        let text = alert_text(&alert, AlertStep::Abbreviated);
        assert_eq!(text.lines[1].to_string(), "Use the ramp");
        assert_eq!(alert_text(&alert, AlertStep::HeaderOnly).lines.len(), 1);
    }
}
