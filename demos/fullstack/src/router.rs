//! HTTP side of a [`Service`]: every method as a route.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::MethodFilter;
use axum::{Json, Router};
use tracing::warn;
use typed_rpc::Error;
use typed_rpc::server::{RouterExt, wrap_action, wrap_consumer, wrap_getter, wrap_handler};

use crate::model::{
    CreateUserRequest, DeleteUserRequest, ErrorResponse, GetUserRequest, ListUsersRequest,
    UpdateArticleRequest,
};
use crate::service::{Service, ServiceError};

/// Maps service errors to status codes: unknown users are 404, invalid input
/// and undecodable requests are 400, anything else is 500.
pub fn error_response(error: Error) -> Response {
    let (status, code) = match error.downcast_service_ref::<ServiceError>() {
        Some(ServiceError::UserNotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        Some(ServiceError::InvalidInput(_)) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        None if error.is_decode() => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };
    warn!(%error, status = status.as_u16(), "request failed");

    let body = ErrorResponse {
        code: code.to_string(),
        message: error.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Routes of `service`.
///
/// | Method | Path             | Shape    |
/// |--------|------------------|----------|
/// | GET    | `/health`        | getter   |
/// | POST   | `/tasks`         | action   |
/// | POST   | `/users`         | handler  |
/// | GET    | `/users`         | handler  |
/// | GET    | `/users/:id`     | handler  |
/// | DELETE | `/users/:id`     | consumer |
/// | PUT    | `/articles/:id`  | handler  |
#[must_use]
pub fn router<S: Service + 'static>(service: Arc<S>) -> Router {
    let health = {
        let service = Arc::clone(&service);
        wrap_getter(move || {
            let service = Arc::clone(&service);
            async move { service.health().await }
        })
    };

    let trigger_task = {
        let service = Arc::clone(&service);
        wrap_action(move || {
            let service = Arc::clone(&service);
            async move { service.trigger_task().await }
        })
    };

    let create_user = {
        let service = Arc::clone(&service);
        wrap_handler(move |req: CreateUserRequest| {
            let service = Arc::clone(&service);
            async move { service.create_user(req).await }
        })
        .with_error_handler(error_response)
    };

    let list_users = {
        let service = Arc::clone(&service);
        wrap_handler(move |req: ListUsersRequest| {
            let service = Arc::clone(&service);
            async move { service.list_users(req).await }
        })
    };

    let get_user = {
        let service = Arc::clone(&service);
        wrap_handler(move |req: GetUserRequest| {
            let service = Arc::clone(&service);
            async move { service.get_user(req).await }
        })
        .with_error_handler(error_response)
    };

    let delete_user = {
        let service = Arc::clone(&service);
        wrap_consumer(move |req: DeleteUserRequest| {
            let service = Arc::clone(&service);
            async move { service.delete_user(req).await }
        })
        .with_error_handler(error_response)
    };

    let update_article = wrap_handler(move |req: UpdateArticleRequest| {
        let service = Arc::clone(&service);
        async move { service.update_article(req).await }
    });

    Router::new()
        .rpc(MethodFilter::GET, "/health", health)
        .rpc(MethodFilter::POST, "/tasks", trigger_task)
        .rpc(MethodFilter::POST, "/users", create_user)
        .rpc(MethodFilter::GET, "/users", list_users)
        .rpc(MethodFilter::GET, "/users/:id", get_user)
        .rpc(MethodFilter::DELETE, "/users/:id", delete_user)
        .rpc(MethodFilter::PUT, "/articles/:id", update_article)
}
