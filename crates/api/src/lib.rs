//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for invoices, customers and status changes
//! - Bearer-token authentication middleware
//! - The `AuthUser` extractor carrying the acting user

pub mod middleware;
pub mod routes;

use axum::Router;
use invoicer_core::listing::ListingCache;
use invoicer_db::repositories::InvoicePage;
use invoicer_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Cached invoice list pages, cleared on every invoice write.
    pub listings: ListingCache<InvoicePage>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
