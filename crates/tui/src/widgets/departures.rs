//! Departure sections.
//!
//! The departures region fits its sections in two moves. When the payload
//! or the area changes, the body rows are split between sections with
//! [`assign_sizes`] and every section is folded at its share. After that,
//! each overflowing measurement trims one unit through a
//! [`TrimSession`] until the sections fit or nothing more can go.
//!
//! Sections that opt into `include_later` show what was trimmed in a paged
//! strip underneath (see [`later`](super::later)).

use std::time::Instant;

use headway_config::CarouselConfig;
use headway_fit::{
    Axis, CarouselMode, Epoch, FitSession, FoldedSection, IdentityToken, NodeRef, Pass, SectionSize,
    Tick, TickedIndex, TrimSession, assign_sizes, page_duration,
};
use headway_protocol::{Row, Section, WidgetData};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::Block,
};
use tracing::debug;

use super::later::{page_count, strip_lines};
use super::{DIM, HEADING, Region, framed, inner_area, paint_into};

/// Shown in place of the rows of a section that has none.
pub const EMPTY_SECTION_TEXT: &str = "No departures";

const ROUTE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const TIMES: Style = Style::new().fg(Color::Yellow);

/// Splits `height` body rows between `sections` and folds each at its share.
///
/// Section headings take one row each and are not part of the budget.
///
/// # Examples
///
/// ```
/// use headway_protocol::dummy::dummy_screen;
/// use headway_protocol::WidgetData;
/// use headway_tui::widgets::fold_sections;
///
/// let screen = dummy_screen();
/// let WidgetData::Departures(departures) = &screen.widgets[0] else { unreachable!() };
///
/// // Two headings leave six rows: four for inbound, two for outbound.
/// let folded = fold_sections(&departures.sections, 8);
/// assert_eq!(folded[0].above_fold.len(), 4);
/// assert_eq!(folded[1].above_fold.len(), 2);
/// ```
#[must_use]
pub fn fold_sections(sections: &[Section], height: u16) -> Vec<FoldedSection> {
    let headings = sections.iter().filter(|s| s.name.is_some()).count();
    let budget = usize::from(height).saturating_sub(headings);
    let sizes: Vec<SectionSize> = sections.iter().map(SectionSize::from_section).collect();

    let counts = assign_sizes(&sizes, budget);
    debug!(budget, ?counts, "assigned section rows");
    sections
        .iter()
        .zip(counts)
        .map(|(section, rows)| FoldedSection::fold(section, rows))
        .collect()
}

/// Returns the single line a row is rendered as in `width` columns.
///
/// A departure row that does not fit switches to its abbreviated headsign,
/// if it has one.
#[must_use]
pub fn row_line(row: &Row, width: u16) -> Line<'static> {
    match row {
        Row::DepartureRow(row) => {
            let times = row
                .times
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let line = departure_line(&row.route, &row.headsign, &times);
            match &row.headsign_abbrev {
                Some(abbrev) if line.width() > usize::from(width) => {
                    departure_line(&row.route, abbrev, &times)
                }
                _ => line,
            }
        }
        Row::NoticeRow(row) => Line::styled(row.text.clone(), DIM.add_modifier(Modifier::ITALIC)),
    }
}

fn departure_line(route: &str, headsign: &str, times: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{route:<4}"), ROUTE),
        Span::raw(" "),
        Span::raw(headsign.to_string()),
        Span::raw("  "),
        Span::styled(times.to_string(), TIMES),
    ])
}

/// Region state for a departures widget.
#[derive(Debug)]
pub struct DeparturesRegion {
    node: NodeRef,
    session: TrimSession,
    later: Vec<TickedIndex>,
    cadence: CarouselConfig,
}

impl DeparturesRegion {
    /// Creates a region whose later strips page with `cadence`.
    #[must_use]
    pub fn new(cadence: CarouselConfig) -> Self {
        Self {
            node: NodeRef::new(),
            session: TrimSession::new(Axis::Y),
            later: Vec::new(),
            cadence,
        }
    }

    /// Returns the sections as currently folded.
    #[must_use]
    pub fn sections(&self) -> &[FoldedSection] {
        self.session.sections()
    }

    /// Returns the later-strip carousel of section `index`.
    #[must_use]
    pub fn later_pages(&self, index: usize) -> Option<&TickedIndex> {
        self.later.get(index)
    }

    /// Returns `true` once trimming has settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.session.is_done()
    }

    /// Restarts every later carousel whose page count changed.
    fn sync_later(&mut self, now: Instant) {
        let interval = self.cadence.page_interval();
        let sections = self.session.sections();
        self.later
            .resize_with(sections.len(), || TickedIndex::new(0, interval, CarouselMode::Loop));

        for (pages, section) in self.later.iter_mut().zip(sections) {
            let wanted = if section.layout.include_later {
                page_count(section.below_fold.len())
            } else {
                0
            };
            if pages.num_pages() != wanted {
                pages.set_interval(page_duration(
                    wanted,
                    self.cadence.total_cycle(),
                    self.cadence.max_page_duration(),
                ));
                pages.restart(wanted, now);
            }
        }
    }
}

impl Region for DeparturesRegion {
    fn label(&self) -> &'static str {
        "departures"
    }

    fn sync(&mut self, widget: &WidgetData, area: Rect, epoch: Epoch, now: Instant) {
        let WidgetData::Departures(departures) = widget else {
            return;
        };
        let inner = inner_area(area);
        let token = IdentityToken::of(epoch, &inner);
        if self
            .session
            .sync(token, || fold_sections(&departures.sections, inner.height))
        {
            self.later.clear();
            self.sync_later(now);
        }
    }

    fn render(&self, _widget: &WidgetData, area: Rect, buf: &mut Buffer) {
        let inner = framed(Block::bordered().title(" Departures "), area, buf);

        let mut lines = Vec::new();
        for (index, section) in self.session.sections().iter().enumerate() {
            if let Some(name) = &section.name {
                lines.push(Line::styled(name.clone(), HEADING));
            }
            if !section.has_rows() {
                lines.push(Line::styled(EMPTY_SECTION_TEXT, DIM));
            }
            lines.extend(section.above_fold.iter().map(|row| row_line(row, inner.width)));

            if section.layout.include_later && !section.below_fold.is_empty() {
                let page = self.later.get(index).map_or(0, TickedIndex::page_index);
                lines.extend(strip_lines(&section.below_fold, page, inner.width));
            }
        }

        paint_into(&self.node, Text::from(lines), inner, false, buf);
    }

    fn after_paint(&mut self, now: Instant) -> Pass {
        let pass = self.session.after_paint(&self.node);
        if pass.needs_render() {
            self.sync_later(now);
        }
        pass
    }

    fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for pages in &mut self.later {
            changed |= pages.tick(now) != Tick::Idle;
        }
        changed
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.later.iter().filter_map(TickedIndex::next_deadline).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, settle, test_cadence};
    use headway_protocol::dummy::dummy_screen;
    use headway_protocol::{DeparturesWidget, Layout};
    use std::time::Duration;

    fn dummy_departures() -> WidgetData {
        dummy_screen().widgets[0].clone()
    }

    fn ids(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(Row::id).collect()
    }

    #[test]
    fn everything_fits_in_a_tall_area() {
        let widget = dummy_departures();
        let mut region = DeparturesRegion::new(test_cadence());

        let (buf, passes) = settle(&mut region, &widget, Rect::new(0, 0, 60, 22), Instant::now());
        assert_eq!(passes, vec![Pass::Settled]);
        assert!(region.sections().iter().all(|s| s.below_fold.is_empty()));

        let rendered = buffer_to_string(&buf);
        assert!(rendered.contains("Inbound"));
        assert!(rendered.contains("Sullivan Square Station"));
        assert!(rendered.contains("Route 66 detoured"));
        assert!(!rendered.contains("Later"));
    }

    #[test]
    fn trims_into_the_later_strip() {
        let widget = dummy_departures();
        let mut region = DeparturesRegion::new(test_cadence());

        // Eight body rows: the later strip costs three of them.
        let (buf, passes) = settle(&mut region, &widget, Rect::new(0, 0, 60, 10), Instant::now());
        assert_eq!(passes.last(), Some(&Pass::Settled));
        assert_eq!(passes.len(), 7);

        let inbound = &region.sections()[0];
        assert_eq!(ids(&inbound.above_fold), ["r1"]);
        assert_eq!(
            ids(&inbound.below_fold),
            ["r47", "r47", "r68", "r68", "r68", "r69", "r86"]
        );
        let outbound = &region.sections()[1];
        assert_eq!(ids(&outbound.above_fold), ["r1o", "n66"]);

        let rendered = buffer_to_string(&buf);
        assert!(rendered.contains("Later ●○○○"));
        assert!(rendered.contains("Now, 7 min, 16 min"));
    }

    #[test]
    fn later_strip_pages_on_its_own_cadence() {
        let widget = dummy_departures();
        let mut region = DeparturesRegion::new(test_cadence());
        let t0 = Instant::now();
        settle(&mut region, &widget, Rect::new(0, 0, 60, 10), t0);

        // Four pages over a six second cycle, capped at two seconds each.
        let pages = region.later_pages(0).unwrap();
        assert_eq!(pages.num_pages(), 4);
        assert_eq!(pages.interval(), Duration::from_millis(1500));
        assert_eq!(region.next_deadline(), Some(t0 + Duration::from_millis(1500)));

        assert!(!region.tick(t0 + Duration::from_millis(1000)));
        assert!(region.tick(t0 + Duration::from_millis(1500)));
        assert_eq!(region.later_pages(0).unwrap().page_index(), 1);
    }

    #[test]
    fn trimming_conserves_rows() {
        let widget = dummy_departures();
        let WidgetData::Departures(departures) = &widget else {
            unreachable!()
        };
        let mut region = DeparturesRegion::new(test_cadence());
        settle(&mut region, &widget, Rect::new(0, 0, 60, 9), Instant::now());

        for (folded, original) in region.sections().iter().zip(&departures.sections) {
            assert_eq!(folded.restore(), original.rows);
        }
    }

    #[test]
    fn empty_section_shows_placeholder() {
        let widget = WidgetData::Departures(DeparturesWidget {
            sections: vec![Section::new("quiet", Layout::default(), Vec::new())],
        });
        let mut region = DeparturesRegion::new(test_cadence());

        let (buf, _) = settle(&mut region, &widget, Rect::new(0, 0, 30, 4), Instant::now());
        assert!(buffer_to_string(&buf).contains(EMPTY_SECTION_TEXT));
    }

    #[test]
    fn section_folded_to_nothing_is_not_empty() {
        let layout = Layout::new(0, None, None);
        let row = |id: &str, headsign: &str| -> Row {
            headway_protocol::DepartureRow::new(
                id,
                "1",
                headsign,
                vec![headway_protocol::TimeEntry::minutes(4)],
            )
            .into()
        };
        let widget = WidgetData::Departures(DeparturesWidget {
            sections: vec![
                Section::new("busy", layout, vec![row("r1", "Alewife")]),
                Section::new("other", layout, vec![row("o1", "Ashmont"), row("o2", "Ashmont")]),
            ],
        });
        let mut region = DeparturesRegion::new(test_cadence());

        // One body row for two sections: one of them gets nothing.
        let (buf, passes) = settle(&mut region, &widget, Rect::new(0, 0, 30, 3), Instant::now());
        assert_eq!(passes.last(), Some(&Pass::Settled));
        assert!(
            region
                .sections()
                .iter()
                .any(|s| s.above_fold.is_empty() && !s.below_fold.is_empty())
        );
        assert_eq!(
            region.sections().iter().map(|s| s.above_fold.len()).sum::<usize>(),
            1
        );

        let rendered = buffer_to_string(&buf);
        assert!(!rendered.contains(EMPTY_SECTION_TEXT));
        assert!(rendered.contains("Alewife") || rendered.contains("Ashmont"));
    }

    #[test]
    fn new_area_refolds() {
        let widget = dummy_departures();
        let mut region = DeparturesRegion::new(test_cadence());
        let now = Instant::now();
        settle(&mut region, &widget, Rect::new(0, 0, 60, 10), now);
        assert!(!region.sections()[0].below_fold.is_empty());

        settle(&mut region, &widget, Rect::new(0, 0, 60, 22), now);
        assert!(region.sections()[0].below_fold.is_empty());
        assert_eq!(region.later_pages(0).unwrap().num_pages(), 0);
    }

    #[test]
    fn notice_rows_render_as_text() {
        let row: Row = headway_protocol::NoticeRow {
            id: "n".to_string(),
            text: "Stop closed".to_string(),
        }
        .into();
        assert_eq!(row_line(&row, 40).to_string(), "Stop closed");
    }

    #[test]
    fn departure_row_layout() {
        let row: Row = headway_protocol::DepartureRow::new(
            "r",
            "47",
            "Central",
            vec![headway_protocol::TimeEntry::minutes(0), headway_protocol::TimeEntry::minutes(9)],
        )
        .into();
        insta::assert_snapshot!(row_line(&row, 40).to_string(), @"47   Central  Now, 9 min");
    }

    #[test]
    fn narrow_rows_use_abbreviated_headsign() {
        let mut row = headway_protocol::DepartureRow::new(
            "r",
            "86",
            "Sullivan Square Station",
            vec![headway_protocol::TimeEntry::minutes(14)],
        );
        row.headsign_abbrev = Some("Sullivan".to_string());
        let row: Row = row.into();

        assert_eq!(row_line(&row, 40).to_string(), "86   Sullivan Square Station  14 min");
        assert_eq!(row_line(&row, 24).to_string(), "86   Sullivan  14 min");

        // Without an abbreviation the full headsign is kept and clipped.
        let Row::DepartureRow(mut plain) = row else { unreachable!() };
        plain.headsign_abbrev = None;
        let plain: Row = plain.into();
        assert_eq!(row_line(&plain, 24).to_string(), "86   Sullivan Square Station  14 min");
    }
}
