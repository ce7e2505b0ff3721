//! Consistent JSON error responses.

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::json;

use orla_core::DomainError;

use crate::app::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(domain) => domain_error_to_response(domain),
        ServiceError::Store(store) => {
            tracing::error!(error = %store, "store operation failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal storage failure",
            )
        }
        ServiceError::Password(e) => {
            tracing::error!(error = %e, "password hashing failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal failure")
        }
        ServiceError::Token(e) => {
            tracing::error!(error = %e, "token signing failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal failure")
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DomainError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        DomainError::DuplicateUsername => {
            json_error(StatusCode::BAD_REQUEST, "duplicate_username", message)
        }
        DomainError::DuplicateEmail => json_error(StatusCode::BAD_REQUEST, "duplicate_email", message),
        DomainError::InvalidDateFormat => {
            json_error(StatusCode::BAD_REQUEST, "invalid_date", message)
        }
        DomainError::AuthenticationFailed => bearer_challenge("authentication_failed", message),
        DomainError::InvalidToken => bearer_challenge("invalid_token", message),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", message),
    }
}

/// Uniform 401 used by the auth middleware; carries the bearer challenge
/// header and deliberately says nothing about why the credentials failed.
pub fn unauthenticated() -> axum::response::Response {
    bearer_challenge("invalid_token", DomainError::InvalidToken.to_string())
}

fn bearer_challenge(code: &'static str, message: impl Into<String>) -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
