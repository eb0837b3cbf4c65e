//! App loop message types.
//!
//! This module defines the message enum produced by the input handler and
//! consumed by the sign's application state.

use serde::{Deserialize, Serialize};

/// Messages that drive the sign's application loop.
///
/// # Examples
///
/// ```
/// use headway_protocol::Message;
///
/// let msg = Message::Refresh;
/// assert!(!msg.is_terminating());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Quit the application.
    Quit,
    /// Fetch a fresh payload now instead of waiting for the next poll.
    Refresh,
    /// The terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
}

impl Message {
    /// Returns `true` if this message should terminate the application.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_protocol::Message;
    ///
    /// assert!(Message::Quit.is_terminating());
    /// assert!(!Message::Refresh.is_terminating());
    /// ```
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Quit)
    }
}
