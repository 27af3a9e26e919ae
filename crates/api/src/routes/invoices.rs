//! Invoice routes: list, create, read, edit and cancel.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use invoicer_core::invoice::{InvoiceForm, InvoiceStatus};
use invoicer_core::listing::{ListingKey, StatusFilter};
use invoicer_db::entities::invoices;
use invoicer_db::repositories::{InvoiceDetail, InvoiceRepository, StatusRepository};
use invoicer_shared::types::{Cents, PageRequest};
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::error_response;
use crate::{AppState, middleware::AuthUser};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}", get(get_invoice).put(update_invoice))
        .route("/invoices/{id}/cancel", post(cancel_invoice))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing invoices.
#[derive(Debug, Default, Deserialize)]
pub struct ListInvoicesQuery {
    /// Search text.
    pub query: Option<String>,
    /// Status tab (`all`, `pending`, `paid`, `canceled`, `overdue`).
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
}

/// Invoice response.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice id.
    pub id: Uuid,
    /// Customer id.
    pub customer_id: Uuid,
    /// Amount in cents.
    pub amount: i64,
    /// Amount in major units, two decimals.
    pub amount_display: String,
    /// Status.
    pub status: String,
    /// Issue date.
    pub date: NaiveDate,
}

impl From<invoices::Model> for InvoiceResponse {
    fn from(model: invoices::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            amount: model.amount,
            amount_display: Cents(model.amount).to_string(),
            status: model.status.to_value(),
            date: model.date,
        }
    }
}

/// Invoice with customer contact details.
#[derive(Debug, Serialize)]
pub struct InvoiceDetailResponse {
    /// The invoice.
    #[serde(flatten)]
    pub invoice: InvoiceResponse,
    /// Customer name.
    pub customer_name: String,
    /// Customer e-mail.
    pub customer_email: String,
    /// Statuses the status dropdown offers for this invoice.
    pub status_choices: Vec<InvoiceStatus>,
}

impl From<InvoiceDetail> for InvoiceDetailResponse {
    fn from(detail: InvoiceDetail) -> Self {
        let invoice = InvoiceResponse::from(detail.invoice);
        let status_choices = InvoiceStatus::parse(&invoice.status)
            .map(|current| current.dropdown_choices())
            .unwrap_or_default();

        Self {
            invoice,
            customer_name: detail.customer_name,
            customer_email: detail.customer_email,
            status_choices,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /invoices - search invoices, served from the listing cache.
async fn list_invoices(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ListInvoicesQuery>,
) -> impl IntoResponse {
    let filter = StatusFilter::parse(params.status.as_deref());
    let key = ListingKey::new(
        params.query.as_deref().unwrap_or_default(),
        filter,
        params.page.unwrap_or(1),
    );

    if let Some(page) = state.listings.get(&key) {
        debug!(query = %key.query, page = key.page, "invoice list cache hit");
        return (StatusCode::OK, Json(&*page)).into_response();
    }

    let generation = state.listings.generation();
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo
        .list(&key.query, key.status, PageRequest::page(key.page))
        .await
    {
        Ok(page) => {
            let page = state.listings.insert(key, page, generation);
            (StatusCode::OK, Json(&*page)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /invoices - create an invoice.
async fn create_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(form): Json<InvoiceForm>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo.create(&form).await {
        Ok(invoice) => {
            state.listings.invalidate_all();
            (StatusCode::CREATED, Json(InvoiceResponse::from(invoice))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /invoices/{id} - invoice with customer.
async fn get_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(detail) => (StatusCode::OK, Json(InvoiceDetailResponse::from(detail))).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /invoices/{id} - edit customer, amount and status.
async fn update_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(form): Json<InvoiceForm>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo.update(id, &form, auth.actor_name()).await {
        Ok(invoice) => {
            state.listings.invalidate_all();
            (StatusCode::OK, Json(InvoiceResponse::from(invoice))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /invoices/{id}/cancel - set status to canceled.
async fn cancel_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = StatusRepository::new((*state.db).clone());

    match repo.cancel(id, auth.actor_name()).await {
        Ok(invoice) => {
            state.listings.invalidate_all();
            info!(invoice_id = %id, "invoice canceled");
            (StatusCode::OK, Json(InvoiceResponse::from(invoice))).into_response()
        }
        Err(e) => error_response(e),
    }
}
