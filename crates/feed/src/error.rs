//! Error types for feed operations.
//!
//! This module defines the error types that can occur while fetching,
//! decoding, and caching screen payloads.

use headway_protocol::ProtocolError;

/// Errors that can occur during feed operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status} for {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// The payload did not match the screen format.
    #[error("invalid payload: {0}")]
    Decode(#[from] ProtocolError),

    /// An I/O error occurred reading a payload file or the cache.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The feed configuration does not name a source.
    #[error("no feed source configured")]
    NoSource,
}

impl Error {
    /// Returns a short, stable signature for grouping repeated failures.
    ///
    /// Two errors with the same signature are the same problem recurring,
    /// even if their messages differ in detail.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_feed::Error;
    ///
    /// let err = Error::Status { status: 503, url: "https://example.com/a".to_string() };
    /// assert_eq!(err.signature(), "status:503");
    /// ```
    #[must_use]
    pub fn signature(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "http:timeout".to_string(),
            Self::Http(e) if e.is_connect() => "http:connect".to_string(),
            Self::Http(_) => "http".to_string(),
            Self::Status { status, .. } => format!("status:{status}"),
            Self::Decode(_) => "decode".to_string(),
            Self::Io(e) => format!("io:{:?}", e.kind()),
            Self::NoSource => "no-source".to_string(),
        }
    }
}

/// A specialized Result type for feed operations.
pub type Result<T> = std::result::Result<T, Error>;
