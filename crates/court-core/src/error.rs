//! # Validation Errors
//!
//! Structured errors for field validation at construction time. Each
//! variant carries the offending field and the observed value or length so
//! the API boundary can produce a precise 422 without re-deriving context.

use thiserror::Error;

/// Errors raised when validating user-supplied field values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A string field fell outside its length bounds.
    #[error("{field} must be between {min} and {max} characters, got {len}")]
    LengthOutOfBounds {
        /// The field name as it appears on the wire.
        field: &'static str,
        /// Inclusive minimum length.
        min: usize,
        /// Inclusive maximum length.
        max: usize,
        /// Observed length.
        len: usize,
    },

    /// A required text field was empty or whitespace-only.
    #[error("{field} must not be empty")]
    Empty {
        /// The field name as it appears on the wire.
        field: &'static str,
    },

    /// An email address failed the structural check.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// An unrecognized role string (storage round-trips, never the API —
    /// the API rejects unknown roles at deserialization).
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// An unrecognized submission status string.
    #[error("unknown submission status: {0}")]
    UnknownStatus(String),

    /// An unrecognized vote value string.
    #[error("unknown vote value: {0}")]
    UnknownVote(String),
}
