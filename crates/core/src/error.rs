//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures. Infrastructure
/// concerns (database, pool, locks) belong in `orla-infra`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Registration attempted with a username that is already taken.
    #[error("username is already registered")]
    DuplicateUsername,

    /// Registration attempted with an email that is already taken.
    #[error("email is already registered")]
    DuplicateEmail,

    /// Login with an unknown username or a wrong password. Deliberately a
    /// single variant: the response must not distinguish the two cases.
    #[error("incorrect username or password")]
    AuthenticationFailed,

    /// Bearer token missing, malformed, tampered with, or expired.
    #[error("could not validate credentials")]
    InvalidToken,

    /// A requested record was not found.
    #[error("not found")]
    NotFound,

    /// The acting user is not the owner of the record being mutated.
    #[error("you do not have permission to modify this event")]
    Forbidden,

    /// An event date string was not valid ISO-8601.
    #[error("invalid date format, use ISO-8601 (YYYY-MM-DDTHH:MM:SS)")]
    InvalidDateFormat,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
