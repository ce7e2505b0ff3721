//! Postgres-backed store.
//!
//! Uses the SQLx connection pool (thread-safe, scoped acquisition with
//! release on every exit path). Each operation is a single statement, so the
//! database's own transaction boundary is the atomicity guarantee; images
//! live inline in a BYTEA column next to their MIME type.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};

use orla_auth::{NewUser, User};
use orla_core::{EventId, UserId};
use orla_events::{Event, EventFilter, EventImage, NewEvent};

use super::{EventStore, StoreError, UserStore};

const USER_COLUMNS: &str = "id, username, email, full_name, password_hash, created_at";
const EVENT_COLUMNS: &str = "id, title, description, date, location, category, \
                             image_data, image_content_type, creator_id, created_at, updated_at";

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with a small pool sized for a low-traffic service.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the schema if it does not exist yet (idempotent, run at boot).
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id            BIGSERIAL PRIMARY KEY,
                username      VARCHAR(50)  NOT NULL UNIQUE,
                email         VARCHAR(100) NOT NULL UNIQUE,
                full_name     VARCHAR(100),
                password_hash VARCHAR(200) NOT NULL,
                created_at    TIMESTAMPTZ  NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id                 BIGSERIAL PRIMARY KEY,
                title              VARCHAR(200) NOT NULL,
                description        TEXT,
                date               TIMESTAMPTZ  NOT NULL,
                location           VARCHAR(200) NOT NULL,
                category           VARCHAR(50)  NOT NULL DEFAULT 'General',
                image_data         BYTEA,
                image_content_type VARCHAR(100),
                creator_id         BIGINT       NOT NULL REFERENCES users (id),
                created_at         TIMESTAMPTZ  NOT NULL DEFAULT now(),
                updated_at         TIMESTAMPTZ
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS events_date_idx ON events (date DESC)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Map unique-constraint violations (a racing registration slipping past the
/// pre-checks) to `Constraint`; everything else stays a database error.
fn map_db_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::Constraint(db_err.constraint().unwrap_or("unique").to_string());
        }
    }
    StoreError::Database(err)
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    full_name: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            email: row.email,
            full_name: row.full_name,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: i64,
    title: String,
    description: Option<String>,
    date: DateTime<Utc>,
    location: String,
    category: String,
    image_data: Option<Vec<u8>>,
    image_content_type: Option<String>,
    creator_id: i64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let image = match (row.image_data, row.image_content_type) {
            (Some(data), Some(content_type)) => Some(EventImage { data, content_type }),
            _ => None,
        };
        Self {
            id: EventId::new(row.id),
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            category: row.category,
            image,
            creator: UserId::new(row.creator_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, email, full_name, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        let row: UserRow = sqlx::query_as(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.into())
    }

    async fn by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl EventStore for PostgresStore {
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        let (image_data, image_content_type) = match event.image {
            Some(image) => (Some(image.data), Some(image.content_type)),
            None => (None, None),
        };

        let sql = format!(
            "INSERT INTO events \
                 (title, description, date, location, category, \
                  image_data, image_content_type, creator_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {EVENT_COLUMNS}"
        );
        let row: EventRow = sqlx::query_as(&sql)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location)
            .bind(&event.category)
            .bind(image_data)
            .bind(image_content_type)
            .bind(event.creator.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.into())
    }

    async fn by_id(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%') \
               AND ($2::text IS NULL OR category = $2) \
               AND ($3::bigint IS NULL OR creator_id = $3) \
             ORDER BY date DESC, id DESC \
             OFFSET $4 LIMIT $5"
        );
        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(filter.search.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.creator.map(|c| c.as_i64()))
            .bind(filter.skip())
            .bind(filter.limit())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, event: Event) -> Result<Option<Event>, StoreError> {
        let (image_data, image_content_type) = match event.image {
            Some(image) => (Some(image.data), Some(image.content_type)),
            None => (None, None),
        };

        let sql = format!(
            "UPDATE events \
             SET title = $1, description = $2, date = $3, location = $4, category = $5, \
                 image_data = $6, image_content_type = $7, updated_at = now() \
             WHERE id = $8 RETURNING {EVENT_COLUMNS}"
        );
        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location)
            .bind(&event.category)
            .bind(image_data)
            .bind(image_content_type)
            .bind(event.id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: EventId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
