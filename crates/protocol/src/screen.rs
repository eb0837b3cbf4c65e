//! The top-level screen payload.
//!
//! A [`ScreenData`] is the unit the server pushes on every poll. The sign
//! never mutates it; fitting state is derived from it and discarded when the
//! next payload arrives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};
use crate::widget::WidgetData;

/// Header content shown across the top of the sign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeaderData {
    /// Full stop or station name.
    pub title: String,
    /// Shorter name for narrow signs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_abbrev: Option<String>,
}

impl HeaderData {
    /// Returns the abbreviated title, falling back to the full title.
    #[must_use]
    pub fn short_title(&self) -> &str {
        self.title_abbrev.as_deref().unwrap_or(&self.title)
    }
}

/// A complete screen payload.
///
/// # Examples
///
/// ```
/// use headway_protocol::ScreenData;
///
/// let screen = ScreenData::from_json(r#"{"screen_id": "s", "header": {"title": "Park St"}}"#)
///     .unwrap();
/// assert!(screen.widgets.is_empty());
/// assert_eq!(screen.header.short_title(), "Park St");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenData {
    /// Identifier of the screen this payload is for.
    pub screen_id: String,
    /// When the server produced this payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    /// Header content.
    #[serde(default)]
    pub header: HeaderData,
    /// Body widgets, top to bottom.
    #[serde(default)]
    pub widgets: Vec<WidgetData>,
}

impl ScreenData {
    /// Parses and validates a payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::DeserializationFailed`] if the JSON does not
    /// match the payload shape, or [`ProtocolError::InvalidLayout`] if a
    /// section declares contradictory bounds.
    pub fn from_json(json: &str) -> Result<Self> {
        let screen: Self =
            serde_json::from_str(json).map_err(ProtocolError::DeserializationFailed)?;
        screen.validate()?;
        Ok(screen)
    }

    /// Serializes the payload to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::SerializationFailed`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ProtocolError::SerializationFailed)
    }

    /// Validates every section layout in the payload.
    ///
    /// # Errors
    ///
    /// Returns the first layout validation error found.
    pub fn validate(&self) -> Result<()> {
        for widget in &self.widgets {
            if let WidgetData::Departures(departures) = widget {
                for section in &departures.sections {
                    section.layout.validate(&section.id)?;
                }
            }
        }
        Ok(())
    }
}
