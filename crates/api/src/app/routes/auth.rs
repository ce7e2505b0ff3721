//! Account routes: register, login, current user.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::Extension,
    response::IntoResponse,
    routing::{get, post},
};

use orla_core::DomainError;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::CurrentUser;
use crate::middleware::{self, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let registration = crate::app::services::Registration {
        username: body.username,
        email: body.email,
        full_name: body.full_name,
        password: body.password,
    };

    match services.register(registration).await {
        Ok(user) => Json(dto::UserResponse::from(&user)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::LoginForm>,
) -> axum::response::Response {
    match services.login(&form.username, &form.password).await {
        Ok(Some((token, user))) => Json(dto::TokenResponse::bearer(token, &user)).into_response(),
        // One response for unknown username and wrong password alike.
        Ok(None) => errors::domain_error_to_response(DomainError::AuthenticationFailed),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn me(Extension(current): Extension<CurrentUser>) -> axum::response::Response {
    Json(dto::UserResponse::from(current.user())).into_response()
}
