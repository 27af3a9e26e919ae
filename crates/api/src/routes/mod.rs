//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use invoicer_shared::AppError;
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod customers;
pub mod health;
pub mod invoices;
pub mod status;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(customers::routes())
        .merge(invoices::routes())
        .merge(status::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

/// Builds the JSON error response for an application error.
///
/// Bodies are `{"error": code, "message": text}`; form errors add
/// `"errors": {field: [messages]}`.
pub(crate) fn error_response(err: impl Into<AppError>) -> Response {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if err.is_server_error() {
        error!(error = %err, "request failed");
    }

    let body = match &err {
        AppError::InvalidForm { message, fields } => json!({
            "error": err.error_code(),
            "message": message,
            "errors": fields,
        }),
        AppError::Database(_) | AppError::Internal(_) => json!({
            "error": err.error_code(),
            "message": "Database Error: Failed to process request.",
        }),
        AppError::Unauthorized(message)
        | AppError::NotFound(message)
        | AppError::Validation(message) => json!({
            "error": err.error_code(),
            "message": message,
        }),
    };

    (status, Json(body)).into_response()
}
