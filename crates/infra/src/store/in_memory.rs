//! In-memory store.
//!
//! Intended for tests/dev. Mirrors the relational schema's behavior:
//! sequential ids, username/email uniqueness, date-descending listing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use orla_auth::{NewUser, User};
use orla_core::{EventId, UserId};
use orla_events::{Event, EventFilter, NewEvent};

use super::{EventStore, StoreError, UserStore};

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<UserId, User>,
    events: HashMap<EventId, Event>,
    next_user_id: i64,
    next_event_id: i64,
}

/// One store serving both traits, like the single database does.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.lock()?;

        if inner.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Constraint("users.username".to_string()));
        }
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Constraint("users.email".to_string()));
        }

        inner.next_user_id += 1;
        let stored = User {
            id: UserId::new(inner.next_user_id),
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        inner.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        let mut inner = self.lock()?;

        inner.next_event_id += 1;
        let stored = Event {
            id: EventId::new(inner.next_event_id),
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            category: event.category,
            image: event.image,
            creator: event.creator,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.events.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn by_id(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.lock()?.events.get(&id).cloned())
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let inner = self.lock()?;

        let mut matched: Vec<Event> = inner
            .events
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();

        // Date descending; id descending breaks ties deterministically.
        matched.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        Ok(matched
            .into_iter()
            .skip(filter.skip() as usize)
            .take(filter.limit() as usize)
            .collect())
    }

    async fn update(&self, event: Event) -> Result<Option<Event>, StoreError> {
        let mut inner = self.lock()?;

        if !inner.events.contains_key(&event.id) {
            return Ok(None);
        }

        let mut stored = event;
        stored.updated_at = Some(Utc::now());
        inner.events.insert(stored.id, stored.clone());
        Ok(Some(stored))
    }

    async fn delete(&self, id: EventId) -> Result<bool, StoreError> {
        Ok(self.lock()?.events.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use orla_events::EventImage;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            full_name: None,
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    fn new_event(title: &str, category: &str, creator: UserId, date: DateTime<Utc>) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: None,
            date,
            location: "Orla".to_string(),
            category: category.to_string(),
            image: None,
            creator,
        }
    }

    #[tokio::test]
    async fn users_get_sequential_ids_and_unique_constraints() {
        let store = InMemoryStore::new();

        let a = UserStore::insert(&store, new_user("ana")).await.unwrap();
        let b = UserStore::insert(&store, new_user("bia")).await.unwrap();
        assert_eq!(a.id.as_i64(), 1);
        assert_eq!(b.id.as_i64(), 2);

        let dup = UserStore::insert(&store, new_user("ana")).await;
        assert!(matches!(dup, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn list_orders_by_date_descending() {
        let store = InMemoryStore::new();
        let ana = UserStore::insert(&store, new_user("ana")).await.unwrap();

        let base: DateTime<Utc> = "2025-07-01T10:00:00Z".parse().unwrap();
        for (title, offset) in [("old", 0), ("newest", 48), ("mid", 24)] {
            EventStore::insert(
                &store,
                new_event(title, "General", ana.id, base + Duration::hours(offset)),
            )
            .await
            .unwrap();
        }

        let listed = store.list(&EventFilter::default()).await.unwrap();
        let titles: Vec<_> = listed.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "mid", "old"]);
    }

    #[tokio::test]
    async fn list_applies_conjunctive_filters_and_pagination() {
        let store = InMemoryStore::new();
        let ana = UserStore::insert(&store, new_user("ana")).await.unwrap();
        let bia = UserStore::insert(&store, new_user("bia")).await.unwrap();

        let base: DateTime<Utc> = "2025-07-01T10:00:00Z".parse().unwrap();
        EventStore::insert(&store, new_event("Praia do Sol", "Beach", ana.id, base))
            .await
            .unwrap();
        EventStore::insert(
            &store,
            new_event("Praia Limpa", "Cleanup", ana.id, base + Duration::hours(1)),
        )
        .await
        .unwrap();
        EventStore::insert(
            &store,
            new_event("Praia do Sul", "Beach", bia.id, base + Duration::hours(2)),
        )
        .await
        .unwrap();

        let filter = EventFilter {
            search: Some("praia".to_string()),
            category: Some("Beach".to_string()),
            creator: Some(ana.id),
            ..Default::default()
        };
        let listed = store.list(&filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Praia do Sol");

        let page = EventFilter {
            skip: 1,
            limit: 1,
            ..Default::default()
        };
        let listed = store.list(&page).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Praia Limpa");
    }

    #[tokio::test]
    async fn update_stamps_updated_at_and_keeps_image() {
        let store = InMemoryStore::new();
        let ana = UserStore::insert(&store, new_user("ana")).await.unwrap();

        let mut draft = new_event("Feira", "Food", ana.id, Utc::now());
        draft.image = Some(EventImage {
            data: vec![0xFF, 0xD8],
            content_type: "image/jpeg".to_string(),
        });
        let stored = EventStore::insert(&store, draft).await.unwrap();
        assert!(stored.updated_at.is_none());

        let updated = store.update(stored.clone()).await.unwrap().unwrap();
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.image, stored.image);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_existed() {
        let store = InMemoryStore::new();
        let ana = UserStore::insert(&store, new_user("ana")).await.unwrap();
        let stored = EventStore::insert(&store, new_event("Feira", "Food", ana.id, Utc::now()))
            .await
            .unwrap();

        assert!(store.delete(stored.id).await.unwrap());
        assert!(!store.delete(stored.id).await.unwrap());
        assert!(EventStore::by_id(&store, stored.id).await.unwrap().is_none());
    }
}
