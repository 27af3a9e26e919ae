//! Customer routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use invoicer_db::repositories::CustomerRepository;
use invoicer_shared::AppError;

use super::error_response;
use crate::{AppState, middleware::AuthUser};

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/customers", get(list_customers))
}

/// GET /customers - id and name of every customer, ordered by name.
async fn list_customers(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(customers) => (StatusCode::OK, Json(customers)).into_response(),
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}
