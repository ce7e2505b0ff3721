//! Application services: the operations behind the HTTP handlers.
//!
//! Each method is one logical request — a single store round-trip or a
//! short fetch-check-write sequence. The ordering rules live here: username
//! conflicts are reported before email conflicts on registration, and
//! existence is checked before ownership on event mutation.

use std::sync::Arc;

use orla_auth::password::PasswordError;
use orla_auth::token::TokenError;
use orla_auth::{NewUser, TokenService, User, hash_password, verify_password};
use orla_core::{DomainError, EventId, UserId};
use orla_events::{Event, EventFilter, EventPatch, NewEvent, assert_owner};
use orla_infra::{EventStore, StoreError, UserStore};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Registration input, as received from the register endpoint.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
}

pub struct AppServices {
    users: Arc<dyn UserStore>,
    events: Arc<dyn EventStore>,
    tokens: TokenService,
}

impl AppServices {
    pub fn new(users: Arc<dyn UserStore>, events: Arc<dyn EventStore>, tokens: TokenService) -> Self {
        Self {
            users,
            events,
            tokens,
        }
    }

    /// Wire everything against a single in-memory store (tests/dev).
    pub fn in_memory(tokens: TokenService) -> Self {
        let store = Arc::new(orla_infra::InMemoryStore::new());
        Self::new(store.clone(), store, tokens)
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn users(&self) -> Arc<dyn UserStore> {
        self.users.clone()
    }

    // ── Accounts ────────────────────────────────────────────────────────

    /// Register a new user. Username conflicts are checked (and reported)
    /// before email conflicts; the password is hashed only after both pass.
    pub async fn register(&self, registration: Registration) -> Result<User, ServiceError> {
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_lowercase();

        if username.is_empty() {
            return Err(DomainError::validation("username cannot be empty").into());
        }
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format").into());
        }
        if registration.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty").into());
        }

        if self.users.by_username(&username).await?.is_some() {
            return Err(DomainError::DuplicateUsername.into());
        }
        if self.users.by_email(&email).await?.is_some() {
            return Err(DomainError::DuplicateEmail.into());
        }

        let password_hash = hash_password(&registration.password)?;

        let user = self
            .users
            .insert(NewUser {
                username,
                email,
                full_name: registration.full_name,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verify credentials. `None` covers both unknown username and wrong
    /// password; callers must not distinguish the two.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, ServiceError> {
        let Some(user) = self.users.by_username(username).await? else {
            return Ok(None);
        };
        if !verify_password(password, &user.password_hash) {
            return Ok(None);
        }
        Ok(Some(user))
    }

    /// Authenticate and mint an access token for the session.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<(String, User)>, ServiceError> {
        let Some(user) = self.authenticate(username, password).await? else {
            return Ok(None);
        };
        let token = self.tokens.issue(&user.username)?;
        Ok(Some((token, user)))
    }

    // ── Events ──────────────────────────────────────────────────────────

    pub async fn create_event(&self, event: NewEvent) -> Result<Event, ServiceError> {
        let created = self.events.insert(event).await?;
        tracing::info!(event_id = %created.id, creator = %created.creator, "event created");
        Ok(created)
    }

    pub async fn get_event(&self, id: EventId) -> Result<Event, ServiceError> {
        Ok(self.events.by_id(id).await?.ok_or(DomainError::NotFound)?)
    }

    pub async fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>, ServiceError> {
        Ok(self.events.list(filter).await?)
    }

    /// Existence before ownership: a missing record is `NotFound` no matter
    /// who asks; only then does a non-owner get `Forbidden`.
    pub async fn update_event(
        &self,
        id: EventId,
        patch: EventPatch,
        acting_user: UserId,
    ) -> Result<Event, ServiceError> {
        let event = self.get_event(id).await?;
        assert_owner(&event, acting_user)?;

        let updated = self
            .events
            .update(patch.apply(event))
            .await?
            // Deleted between fetch and write; classify as the lookup would.
            .ok_or(DomainError::NotFound)?;
        Ok(updated)
    }

    pub async fn delete_event(&self, id: EventId, acting_user: UserId) -> Result<(), ServiceError> {
        let event = self.get_event(id).await?;
        assert_owner(&event, acting_user)?;

        self.events.delete(id).await?;
        tracing::info!(event_id = %id, "event deleted");
        Ok(())
    }
}
