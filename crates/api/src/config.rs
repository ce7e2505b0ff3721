//! Process configuration.
//!
//! Built once at startup from the environment and passed by reference to
//! whatever needs it. Nothing reads environment variables after this.

use chrono::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string; when unset the in-memory store is used.
    pub database_url: Option<String>,
    /// Shared secret for signing access tokens.
    pub secret_key: String,
    /// Access token lifetime.
    pub token_ttl: Duration,
    /// Listen address for the HTTP server.
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let secret_key = std::env::var("SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("SECRET_KEY not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let token_ttl_minutes = std::env::var("TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);

        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            secret_key,
            token_ttl: Duration::minutes(token_ttl_minutes),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}
