//! Shared payload types for the headway application.
//!
//! This crate defines the JSON-shaped tree the screen server pushes to a
//! sign: a [`ScreenData`] with a header and a list of typed widgets, the
//! departure [`Section`]s those widgets carry, and the per-section
//! [`Layout`] policy that guides how aggressively a section may shrink.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`screen`]: The top-level screen payload and header
//! - [`widget`]: Typed widgets (departures, alerts, subway status)
//! - [`section`]: Sections, rows, time entries, and layout policy
//! - [`message`]: App loop messages
//! - [`error`]: Error types for protocol operations
//! - [`dummy`]: Sample payloads for demos and tests
//!
//! # Examples
//!
//! Parsing a payload and counting the departures it carries:
//!
//! ```
//! use headway_protocol::{ScreenData, WidgetData};
//!
//! let json = r#"{
//!     "screen_id": "bus-stop-1",
//!     "header": { "title": "Harvard Square" },
//!     "widgets": [
//!         { "type": "departures", "sections": [
//!             { "id": "s1", "rows": [
//!                 { "type": "departure_row", "id": "r1", "route": "1",
//!                   "headsign": "Nubian", "times": [{ "minutes": 3 }] }
//!             ] }
//!         ] }
//!     ]
//! }"#;
//!
//! let screen = ScreenData::from_json(json).unwrap();
//! let WidgetData::Departures(departures) = &screen.widgets[0] else {
//!     panic!("expected departures");
//! };
//! assert_eq!(departures.sections[0].time_entry_count(), 1);
//! ```

pub mod dummy;
pub mod error;
pub mod message;
pub mod screen;
pub mod section;
pub mod widget;

// Re-export primary types at crate root for convenience
pub use error::{ProtocolError, Result};
pub use message::Message;
pub use screen::{HeaderData, ScreenData};
pub use section::{DepartureRow, Layout, NoticeRow, Row, Section, TimeEntry};
pub use widget::{
    Alert, AlertWidget, DeparturesWidget, LineStatus, SubwayStatusWidget, WidgetData, WidgetKind,
};
