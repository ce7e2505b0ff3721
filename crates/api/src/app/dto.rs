//! Request/response DTOs and mapping to/from domain types.

use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orla_auth::User;
use orla_core::{DomainError, EventId, UserId};
use orla_events::{Event, EventFilter, EventImage};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
}

/// Login is an urlencoded form, OAuth2 password style.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Listing query parameters, shared by the public and "my events" views.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ListParams {
    /// Build the domain filter. Empty strings mean "no filter", matching
    /// how HTML forms submit untouched inputs.
    pub fn into_filter(self, creator: Option<UserId>) -> EventFilter {
        let defaults = EventFilter::default();
        EventFilter {
            skip: self.skip.unwrap_or(defaults.skip),
            limit: self.limit.unwrap_or(defaults.limit),
            search: self.search.filter(|s| !s.is_empty()),
            category: self.category.filter(|c| !c.is_empty()),
            creator,
        }
    }
}

/// Fields of the multipart event form. Everything is optional at this
/// layer; the create handler enforces which fields are required.
#[derive(Debug, Default)]
pub struct EventForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub image: Option<EventImage>,
}

impl EventForm {
    /// Drain a multipart body into its known fields; unknown fields are
    /// ignored. An empty image part (no file picked) counts as no image.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, DomainError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| DomainError::validation("malformed multipart body"))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "title" => form.title = Some(read_text(field).await?),
                "description" => form.description = Some(read_text(field).await?),
                "date" => form.date = Some(read_text(field).await?),
                "location" => form.location = Some(read_text(field).await?),
                "category" => form.category = Some(read_text(field).await?),
                "image" => {
                    let content_type = field
                        .content_type()
                        .map(str::to_string)
                        .unwrap_or_else(|| "application/octet-stream".to_string());
                    let data = field
                        .bytes()
                        .await
                        .map_err(|_| DomainError::validation("malformed multipart body"))?;
                    if !data.is_empty() {
                        form.image = Some(EventImage {
                            data: data.to_vec(),
                            content_type,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, DomainError> {
    field
        .text()
        .await
        .map_err(|_| DomainError::validation("malformed multipart body"))
}

// -------------------------
// Response DTOs
// -------------------------

/// Client-facing user payload. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            created_at: user.created_at,
        }
    }
}

/// Client-facing event payload. Image bytes are served by the dedicated
/// image endpoint; here only the MIME type is exposed so clients know an
/// image exists.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub creator_id: UserId,
    pub image_content_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            location: event.location.clone(),
            category: event.category.clone(),
            creator_id: event.creator,
            image_content_type: event.image.as_ref().map(|i| i.content_type.clone()),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserResponse,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user: &User) -> Self {
        Self {
            access_token,
            token_type: "bearer",
            user: user.into(),
        }
    }
}
