//! Error types for the headway-protocol crate.
//!
//! This module defines all error types that can occur when working with
//! payload types, including serialization failures and validation errors.

use thiserror::Error;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Failed to serialize a payload to JSON.
    #[error("failed to serialize to JSON: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    /// Failed to deserialize a payload from JSON.
    #[error("failed to deserialize from JSON: {0}")]
    DeserializationFailed(#[source] serde_json::Error),

    /// A section declares a layout whose bounds contradict each other.
    #[error("invalid layout for section {section}: {reason}")]
    InvalidLayout {
        /// The offending section id.
        section: String,
        /// Why the layout is invalid.
        reason: String,
    },
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
