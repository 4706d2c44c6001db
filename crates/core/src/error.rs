//! Domain error model.

use thiserror::Error;

/// Result type used across the engine's value types.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Raised only while *constructing* values (parsing identifiers, months,
/// validating configuration). Computations over already-built values never fail;
/// they degrade to documented fallbacks instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. out-of-range configuration).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A calendar month label was malformed (expected `YYYY-MM`).
    #[error("invalid month: {0}")]
    InvalidMonth(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_month(msg: impl Into<String>) -> Self {
        Self::InvalidMonth(msg.into())
    }
}
