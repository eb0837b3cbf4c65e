//! Dummy payloads for testing and demonstration.
//!
//! This module provides a sample bus-stop screen with enough departures,
//! alerts and line statuses to exercise every fitting path of the sign.
//!
//! # Examples
//!
//! ```
//! use headway_protocol::dummy::dummy_screen;
//!
//! let screen = dummy_screen();
//! assert_eq!(screen.widgets.len(), 3);
//! ```

use crate::screen::{HeaderData, ScreenData};
use crate::section::{DepartureRow, Layout, NoticeRow, Row, Section, TimeEntry};
use crate::widget::{
    Alert, AlertWidget, DeparturesWidget, LineStatus, SubwayStatusWidget, WidgetData,
};

/// A builder for departure rows.
///
/// This is an internal helper to reduce boilerplate when creating many rows
/// with abbreviated headsigns.
struct RowBuilder {
    row: DepartureRow,
}

impl RowBuilder {
    /// Creates a builder for a row of the given route and headsign.
    fn new(id: &str, route: &str, headsign: &str) -> Self {
        Self {
            row: DepartureRow::new(id, route, headsign, Vec::new()),
        }
    }

    /// Sets the abbreviated headsign.
    fn abbrev(mut self, abbrev: &str) -> Self {
        self.row.headsign_abbrev = Some(abbrev.to_string());
        self
    }

    /// Sets the departure times, in minutes.
    fn minutes(mut self, minutes: &[u32]) -> Self {
        self.row.times = minutes.iter().copied().map(TimeEntry::minutes).collect();
        self
    }

    /// Builds the row.
    fn build(self) -> Row {
        self.row.into()
    }
}

/// Generates a sample bus-stop screen.
///
/// The screen contains:
///
/// - **Departures**: two sections, the first with a later-departures strip
/// - **Alert**: two alerts, one with an abbreviated body
/// - **Subway status**: four lines, two with normal service
///
/// # Examples
///
/// ```
/// use headway_protocol::dummy::dummy_screen;
/// use headway_protocol::WidgetData;
///
/// let screen = dummy_screen();
/// let WidgetData::Departures(departures) = &screen.widgets[0] else {
///     panic!("expected departures first");
/// };
/// assert_eq!(departures.sections.len(), 2);
/// ```
#[must_use]
pub fn dummy_screen() -> ScreenData {
    let inbound = Section {
        id: "inbound".to_string(),
        name: Some("Inbound".to_string()),
        layout: Layout::new(2, Some(4), Some(8)).with_later(),
        rows: vec![
            RowBuilder::new("r1", "1", "Nubian Station via Mass Ave")
                .abbrev("Nubian")
                .minutes(&[0, 7, 16])
                .build(),
            RowBuilder::new("r47", "47", "Central Square")
                .abbrev("Central")
                .minutes(&[3, 24])
                .build(),
            RowBuilder::new("r68", "68", "Kendall/MIT")
                .abbrev("Kendall")
                .minutes(&[5, 35, 65])
                .build(),
            RowBuilder::new("r69", "69", "Lechmere")
                .minutes(&[11])
                .build(),
            RowBuilder::new("r86", "86", "Sullivan Square Station")
                .abbrev("Sullivan")
                .minutes(&[14, 29])
                .build(),
        ],
    };

    let outbound = Section {
        id: "outbound".to_string(),
        name: Some("Outbound".to_string()),
        layout: Layout::new(1, Some(2), Some(4)),
        rows: vec![
            RowBuilder::new("r1o", "1", "Harvard Square")
                .abbrev("Harvard")
                .minutes(&[2, 12])
                .build(),
            NoticeRow {
                id: "n66".to_string(),
                text: "Route 66 detoured via Brighton Ave".to_string(),
            }
            .into(),
        ],
    };

    let alerts = AlertWidget {
        alerts: vec![
            Alert {
                id: "a-red".to_string(),
                header: "Red Line delays".to_string(),
                body: "Delays of up to 20 minutes due to a disabled train near Park Street. \
                       Consider Route 1 bus as an alternative."
                    .to_string(),
                body_abbrev: Some("Up to 20 min delays".to_string()),
            },
            Alert::new(
                "a-elevator",
                "Elevator closed",
                "The Harvard elevator to the busway is closed for repairs.",
            ),
        ],
    };

    let subway = SubwayStatusWidget {
        lines: vec![
            LineStatus {
                line: "Red".to_string(),
                status: "Delays up to 20 minutes".to_string(),
                status_abbrev: Some("Delays".to_string()),
                normal: false,
            },
            LineStatus {
                line: "Orange".to_string(),
                status: "Normal service".to_string(),
                status_abbrev: None,
                normal: true,
            },
            LineStatus {
                line: "Green".to_string(),
                status: "Shuttle buses replace service between Kenmore and Riverside".to_string(),
                status_abbrev: Some("Shuttles".to_string()),
                normal: false,
            },
            LineStatus {
                line: "Blue".to_string(),
                status: "Normal service".to_string(),
                status_abbrev: None,
                normal: true,
            },
        ],
    };

    ScreenData {
        screen_id: "dummy-bus-stop".to_string(),
        fetched_at: None,
        header: HeaderData {
            title: "Harvard Square Busway".to_string(),
            title_abbrev: Some("Harvard".to_string()),
        },
        widgets: vec![
            WidgetData::Departures(DeparturesWidget {
                sections: vec![inbound, outbound],
            }),
            WidgetData::Alert(alerts),
            WidgetData::SubwayStatus(subway),
        ],
    }
}
