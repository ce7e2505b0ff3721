//! User identity record.

use chrono::{DateTime, Utc};
use orla_core::UserId;

/// A registered user.
///
/// # Invariants
/// - `username` and `email` are each globally unique (enforced by the
///   registration flow and by store constraints).
/// - `password_hash` is the salted one-way hash, never the plaintext.
///
/// Deliberately not `Serialize`: client-facing user payloads go through the
/// API response DTOs, which never carry the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A user about to be persisted (id and creation timestamp come from the
/// store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
}
