//! Event record, creation payload, and partial update.

use chrono::{DateTime, Utc};
use orla_core::{DomainError, EventId, UserId};

/// Category applied when a creator does not pick one.
pub const DEFAULT_CATEGORY: &str = "General";

/// An attached image: raw bytes plus the MIME type they were uploaded with.
///
/// Modeled as one value so the bytes and the content type are always present
/// together or absent together; there is no way to store one without the
/// other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventImage {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// A community event.
///
/// # Invariants
/// - `creator` references an existing user and never changes after creation.
/// - `category` is never empty; it defaults to [`DEFAULT_CATEGORY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub image: Option<EventImage>,
    pub creator: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// An event about to be persisted (id and timestamps come from the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub image: Option<EventImage>,
    pub creator: UserId,
}

impl NewEvent {
    /// Normalize an optional category into the stored form.
    pub fn category_or_default(category: Option<String>) -> String {
        match category {
            Some(c) if !c.trim().is_empty() => c,
            _ => DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Partial update for an event: only the fields present are applied, the
/// rest of the record is left untouched. A supplied image replaces the
/// stored bytes and MIME type together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub image: Option<EventImage>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch, consuming the current record and returning the
    /// updated one. The store stamps `updated_at`.
    pub fn apply(self, mut event: Event) -> Event {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = Some(description);
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(image) = self.image {
            event.image = Some(image);
        }
        event
    }
}

/// Only the creator may mutate or delete an event.
///
/// Callers must resolve the record first: a missing record is `NotFound`,
/// and that classification happens before this check ever runs.
pub fn assert_owner(event: &Event, acting_user: UserId) -> Result<(), DomainError> {
    if event.creator != acting_user {
        return Err(DomainError::Forbidden);
    }
    Ok(())
}
