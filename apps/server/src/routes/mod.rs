//! # Route Handlers
//!
//! One module per resource, assembled into the router here. Every route
//! except `/health` and `/api/auth/*` sits behind the auth middleware.

use axum::{middleware, routing::get, routing::post, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::state::AppState;

pub mod auth;
pub mod categories;
pub mod debts;
pub mod export;
pub mod notifications;
pub mod products;
pub mod reports;
pub mod tracking;
pub mod transactions;

// =============================================================================
// Response Envelope
// =============================================================================

/// The `{ "success": true, "data": ... }` envelope every handler returns.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Wraps a payload in the success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

/// A paginated listing payload.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    /// Assembles a page; total_pages rounds up.
    pub fn new(data: Vec<T>, total: i64, page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            (total + limit as i64 - 1) / limit as i64
        };
        Paginated {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

// =============================================================================
// Router Assembly
// =============================================================================

/// Builds the full application router.
pub fn create_router(state: AppState) -> Router {
    // Everything here requires a resolved identity.
    let protected = Router::new()
        .route(
            "/api/products",
            get(products::list).post(products::create),
        )
        .route(
            "/api/products/:id",
            get(products::get).put(products::update).delete(products::remove),
        )
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/api/transactions/:id", get(transactions::get))
        .route("/api/debts", get(debts::list).post(debts::create))
        .route("/api/debts/:id/payments", post(debts::record_payment))
        .route("/api/reports/dashboard", get(reports::dashboard))
        .route("/api/reports/profit-loss", get(reports::profit_loss))
        .route("/api/reports/stock", get(reports::stock))
        .route("/api/couriers", get(tracking::couriers))
        .route(
            "/api/tracking/:transaction_id",
            get(tracking::get).post(tracking::refresh),
        )
        .route("/api/tracking/sweep", post(tracking::sweep))
        .route("/api/notifications", get(notifications::list))
        .route("/api/export/transactions", get(export::transactions))
        .route("/api/export/profit-loss", get(export::profit_loss))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: answers as long as the process is up.
async fn health() -> Json<Envelope<&'static str>> {
    ok("ok")
}
