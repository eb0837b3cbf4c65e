//! Error types for fitting operations.
//!
//! Fitting never fails at runtime: content that cannot be made to fit is
//! rendered in its most compact form instead. The only error is a session
//! configured without any fallback to settle on.

/// Errors that can occur while setting up a fitting session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FitError {
    /// A step resolver was created without any steps.
    #[error("step list is empty: a resolver needs at least one fallback step")]
    EmptySteps,
}

/// A specialized Result type for fitting operations.
pub type Result<T> = std::result::Result<T, FitError>;
