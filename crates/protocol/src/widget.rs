//! Typed widgets carried by a screen payload.
//!
//! Widgets are internally tagged by a `"type"` field so the server can mix
//! kinds freely in one list. [`WidgetKind`] is the bare discriminant, used by
//! the presentation layer to look up a render strategy.

use serde::{Deserialize, Serialize};

use crate::section::Section;

/// The discriminant of a [`WidgetData`].
///
/// # Examples
///
/// ```
/// use headway_protocol::{WidgetData, WidgetKind};
///
/// let widget: WidgetData = serde_json::from_str(r#"{"type": "placeholder"}"#).unwrap();
/// assert_eq!(widget.kind(), WidgetKind::Placeholder);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Departure list.
    Departures,
    /// Service alert card.
    Alert,
    /// Per-line subway status.
    SubwayStatus,
    /// Empty slot.
    Placeholder,
}

/// A widget in the screen body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetData {
    /// Paginated departure sections.
    Departures(DeparturesWidget),
    /// One or more alerts, shown one at a time.
    Alert(AlertWidget),
    /// Status of each subway line.
    SubwayStatus(SubwayStatusWidget),
    /// An empty slot, optionally with a caption.
    Placeholder {
        /// Caption shown in the slot.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl WidgetData {
    /// Returns the discriminant of this widget.
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        match self {
            Self::Departures(_) => WidgetKind::Departures,
            Self::Alert(_) => WidgetKind::Alert,
            Self::SubwayStatus(_) => WidgetKind::SubwayStatus,
            Self::Placeholder { .. } => WidgetKind::Placeholder,
        }
    }
}

/// Departure sections, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeparturesWidget {
    /// The sections to render.
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A service alert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alert {
    /// Server-assigned alert identifier.
    pub id: String,
    /// Short headline (e.g. "Red Line delays").
    pub header: String,
    /// Full description.
    #[serde(default)]
    pub body: String,
    /// Shorter description for small cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_abbrev: Option<String>,
}

impl Alert {
    /// Creates an alert without an abbreviated body.
    #[must_use]
    pub fn new(id: impl Into<String>, header: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            body: body.into(),
            body_abbrev: None,
        }
    }
}

/// Alerts shown one at a time in a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertWidget {
    /// The alerts, most important first.
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

/// The status of a single subway line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineStatus {
    /// Line name (e.g. "Orange").
    pub line: String,
    /// Full status text.
    pub status: String,
    /// Shorter status text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_abbrev: Option<String>,
    /// Whether the line runs normally.
    #[serde(default)]
    pub normal: bool,
}

/// Per-line subway status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubwayStatusWidget {
    /// One entry per line.
    #[serde(default)]
    pub lines: Vec<LineStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_tags() {
        let widget: WidgetData = serde_json::from_str(
            r#"{"type": "alert", "alerts": [{"id": "a1", "header": "Delays"}]}"#,
        )
        .unwrap();
        assert_eq!(widget.kind(), WidgetKind::Alert);
        let WidgetData::Alert(alert) = widget else {
            panic!("expected alert");
        };
        assert_eq!(alert.alerts[0].body, "");

        let widget: WidgetData =
            serde_json::from_str(r#"{"type": "subway_status", "lines": []}"#).unwrap();
        assert_eq!(widget.kind(), WidgetKind::SubwayStatus);
    }

    #[test]
    fn unknown_widget_is_rejected() {
        let result = serde_json::from_str::<WidgetData>(r#"{"type": "weather"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn placeholder_text_is_optional() {
        let widget = WidgetData::Placeholder {
            text: Some("Coming soon".to_string()),
        };
        let json = serde_json::to_string(&widget).unwrap();
        assert_eq!(json, r#"{"type":"placeholder","text":"Coming soon"}"#);
    }
}
