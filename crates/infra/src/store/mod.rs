//! Store traits and errors.

use async_trait::async_trait;
use orla_auth::{NewUser, User};
use orla_core::{EventId, UserId};
use orla_events::{Event, EventFilter, NewEvent};
use thiserror::Error;

pub mod in_memory;
pub mod postgres;

/// Store operation error.
///
/// Infrastructure failures only; business failures (not found, forbidden,
/// duplicates) are decided by the callers on top of `Option` results.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint fired at the store level (e.g. a racing
    /// registration slipping past the pre-checks).
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Persisted user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, assigning id and creation timestamp.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    async fn by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Persisted event records.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event, assigning id and creation timestamp.
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError>;

    async fn by_id(&self, id: EventId) -> Result<Option<Event>, StoreError>;

    /// Filtered, paginated listing, always ordered by event date descending.
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError>;

    /// Persist the full record and stamp `updated_at`. Returns the stored
    /// record, or `None` when the id no longer exists.
    async fn update(&self, event: Event) -> Result<Option<Event>, StoreError>;

    /// Delete by id. Returns whether a record was removed.
    async fn delete(&self, id: EventId) -> Result<bool, StoreError>;
}
