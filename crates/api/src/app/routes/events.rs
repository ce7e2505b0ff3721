//! Event routes: listing, detail, image, and owner-gated mutation.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Multipart, Path, Query},
    http::{HeaderValue, header},
    response::IntoResponse,
    routing::{get, post, put},
};

use orla_core::EventId;
use orla_events::{EventPatch, NewEvent, parse_event_date};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;
use crate::middleware::{self, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    // route_layer keeps the method routers mergeable with the public
    // routes below that share "/" and "/:id".
    let protected = Router::new()
        .route("/my", get(list_my_events))
        .route("/", post(create_event))
        .route("/:id", put(update_event).delete(delete_event))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/", get(list_events))
        .route("/:id", get(get_event))
        .route("/:id/image", get(get_event_image))
        .merge(protected)
}

pub async fn list_events(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    let filter = params.into_filter(None);
    match services.list_events(&filter).await {
        Ok(events) => {
            let items: Vec<dto::EventResponse> = events.iter().map(Into::into).collect();
            Json(items).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_my_events(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    let filter = params.into_filter(Some(current.id()));
    match services.list_events(&filter).await {
        Ok(events) => {
            let items: Vec<dto::EventResponse> = events.iter().map(Into::into).collect();
            Json(items).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_event(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.get_event(EventId::new(id)).await {
        Ok(event) => Json(dto::EventResponse::from(&event)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Serve the stored image bytes under the MIME type they were uploaded
/// with; 404 when the event exists but carries no image.
pub async fn get_event_image(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    let event = match services.get_event(EventId::new(id)).await {
        Ok(event) => event,
        Err(e) => return errors::service_error_to_response(e),
    };

    match event.image {
        Some(image) => {
            let content_type = HeaderValue::from_str(&image.content_type)
                .unwrap_or(HeaderValue::from_static("application/octet-stream"));
            ([(header::CONTENT_TYPE, content_type)], image.data).into_response()
        }
        None => errors::json_error(
            axum::http::StatusCode::NOT_FOUND,
            "not_found",
            "image not found",
        ),
    }
}

pub async fn create_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    multipart: Multipart,
) -> axum::response::Response {
    let form = match dto::EventForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let Some(title) = form.title.filter(|t| !t.trim().is_empty()) else {
        return errors::json_error(
            axum::http::StatusCode::BAD_REQUEST,
            "validation_error",
            "title is required",
        );
    };
    let Some(location) = form.location else {
        return errors::json_error(
            axum::http::StatusCode::BAD_REQUEST,
            "validation_error",
            "location is required",
        );
    };
    let Some(raw_date) = form.date else {
        return errors::json_error(
            axum::http::StatusCode::BAD_REQUEST,
            "validation_error",
            "date is required",
        );
    };
    let date = match parse_event_date(&raw_date) {
        Ok(date) => date,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let new_event = NewEvent {
        title,
        description: form.description,
        date,
        location,
        category: NewEvent::category_or_default(form.category),
        image: form.image,
        creator: current.id(),
    };

    match services.create_event(new_event).await {
        Ok(event) => Json(dto::EventResponse::from(&event)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> axum::response::Response {
    let form = match dto::EventForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let date = match form.date {
        Some(raw) => match parse_event_date(&raw) {
            Ok(date) => Some(date),
            Err(e) => return errors::domain_error_to_response(e),
        },
        None => None,
    };

    let patch = EventPatch {
        title: form.title,
        description: form.description,
        date,
        location: form.location,
        category: form.category,
        image: form.image,
    };

    match services.update_event(EventId::new(id), patch, current.id()).await {
        Ok(event) => Json(dto::EventResponse::from(&event)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.delete_event(EventId::new(id), current.id()).await {
        Ok(()) => Json(serde_json::json!({ "message": "event deleted" })).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
