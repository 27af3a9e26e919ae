//! Status routes: change, restore and the status-change log.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use invoicer_core::status::ChangeLogView;
use invoicer_db::repositories::{RestoreResult, StatusRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error_response;
use super::invoices::InvoiceResponse;
use crate::{AppState, middleware::AuthUser};

/// Creates the status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices/{id}/status", patch(change_status))
        .route("/invoices/{id}/restore", post(restore_status))
        .route("/invoices/{id}/status-changes", get(list_status_changes))
        .route(
            "/invoices/{id}/status-changes/{entry_id}/restore",
            post(restore_from_entry),
        )
}

/// Body of a status change or restore.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Target status.
    #[serde(default)]
    pub status: String,
}

/// Restore response.
#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    /// Invoice after the restore.
    pub invoice: InvoiceResponse,
    /// Confirmation message.
    pub message: &'static str,
}

impl From<RestoreResult> for RestoreResponse {
    fn from(result: RestoreResult) -> Self {
        Self {
            invoice: result.invoice.into(),
            message: result.message,
        }
    }
}

/// PATCH /invoices/{id}/status
async fn change_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusRequest>,
) -> impl IntoResponse {
    let repo = StatusRepository::new((*state.db).clone());

    match repo.change_status(id, &body.status, auth.actor_name()).await {
        Ok(invoice) => {
            state.listings.invalidate_all();
            (StatusCode::OK, Json(InvoiceResponse::from(invoice))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /invoices/{id}/restore
async fn restore_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusRequest>,
) -> impl IntoResponse {
    let repo = StatusRepository::new((*state.db).clone());

    match repo.restore_status(id, &body.status, auth.actor_name()).await {
        Ok(result) => {
            state.listings.invalidate_all();
            (StatusCode::OK, Json(RestoreResponse::from(result))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /invoices/{id}/status-changes - presented change log, newest first.
async fn list_status_changes(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = StatusRepository::new((*state.db).clone());

    match repo.list_change_log(id).await {
        Ok(entries) => {
            (StatusCode::OK, Json(ChangeLogView::present(id, &entries))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /invoices/{id}/status-changes/{entry_id}/restore
async fn restore_from_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, entry_id)): Path<(Uuid, i32)>,
) -> impl IntoResponse {
    let repo = StatusRepository::new((*state.db).clone());

    match repo
        .restore_from_entry(id, entry_id, auth.actor_name())
        .await
    {
        Ok(result) => {
            state.listings.invalidate_all();
            (StatusCode::OK, Json(RestoreResponse::from(result))).into_response()
        }
        Err(e) => error_response(e),
    }
}
