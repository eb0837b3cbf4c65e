//! Error types for configuration operations.
//!
//! Loading a sign's configuration can fail on the file itself, on its
//! syntax, or on values that parse but make no sense for a sign.

use std::path::PathBuf;

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration file could not be read or written.
    #[error("failed to {action} {}: {source}", .path.display())]
    File {
        /// What was being done: `"read"` or `"write"`.
        action: &'static str,
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON5 or does not match the config shape.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json5::Error),

    /// The configuration could not be written out as JSON.
    #[error("cannot encode config: {0}")]
    Encode(#[from] serde_json::Error),

    /// The feed source is missing a field or is ambiguous.
    #[error("invalid feed source: {reason}")]
    InvalidFeed {
        /// The reason the feed source is invalid.
        reason: String,
    },

    /// Invalid polling interval.
    #[error("invalid polling interval: {reason}")]
    InvalidPollingInterval {
        /// The reason the interval is invalid.
        reason: String,
    },

    /// Invalid carousel timing.
    #[error("invalid carousel timing: {reason}")]
    InvalidCarousel {
        /// The reason the timing is invalid.
        reason: String,
    },

    /// The error report window is zero.
    #[error("error report ttl must be at least one second")]
    InvalidErrorTtl,

    /// Failed to determine a platform directory.
    #[error("could not determine the {0} directory")]
    NoPlatformDirectory(&'static str),
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
