//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Covers the deterministic business failures every aggregate can produce:
/// rejected input, a broken invariant, a missing or duplicated record.
/// Operation-specific taxonomies (trainer eligibility, deletion policy)
/// live next to their operations instead of growing variants here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (empty course name, blank file URL, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated (e.g. a command addressed to the
    /// wrong aggregate instance).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The referenced course/enrollment/user/document does not exist.
    #[error("not found")]
    NotFound,

    /// The operation collides with existing state (duplicate registration,
    /// colliding course code).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
