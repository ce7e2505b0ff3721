//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the operations behind the handlers (register, login,
//!   event CRUD) and their error type
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs, multipart form reading
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::AuthState;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    let auth_state = AuthState {
        tokens: services.tokens().clone(),
        users: services.users(),
    };

    // The web client is served from another origin; stay permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/auth", routes::auth::router(auth_state.clone()))
        .nest("/api/events", routes::events::router(auth_state))
        .layer(ServiceBuilder::new().layer(cors))
        .layer(Extension(services))
}
