//! Bearer-token authentication middleware.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use orla_auth::TokenService;
use orla_infra::UserStore;

use crate::app::errors;
use crate::context::CurrentUser;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: TokenService,
    pub users: Arc<dyn UserStore>,
}

/// Verify the bearer token, resolve the acting user, and inject it as a
/// request extension. Every failure mode is the same uniform 401: missing
/// or malformed header, bad signature, expired token, or a subject that no
/// longer resolves to a user.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).ok_or_else(errors::unauthenticated)?;

    let username = state
        .tokens
        .verify(token)
        .map_err(|_| errors::unauthenticated())?;

    let user = state
        .users
        .by_username(&username)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "user lookup failed during authentication");
            errors::unauthenticated()
        })?
        .ok_or_else(errors::unauthenticated)?;

    req.extensions_mut().insert(CurrentUser::new(user));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
