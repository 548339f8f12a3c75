//! HTTP surface: catalog, stateless calculator, and wizard sessions.

pub mod dto;
pub mod errors;
pub mod sessions;

mod calculator;
mod orders;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use dto::CatalogResponse;
use sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { sessions: SessionStore::new(), config: Arc::new(config) }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_request_bytes;
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-printshop"})) }))
        .route("/api/v1/catalog", get(|| async { Json(CatalogResponse::current()) }))
        .route("/api/v1/calculator", post(calculator::evaluate))
        .route("/api/v1/calculator/submit", post(calculator::submit))
        .route("/api/v1/orders", post(orders::open))
        .route("/api/v1/orders/:id", get(orders::show).delete(orders::close))
        .route("/api/v1/orders/:id/product", put(orders::select_product))
        .route("/api/v1/orders/:id/parameters", put(orders::set_parameters))
        .route("/api/v1/orders/:id/file", post(orders::attach_file).delete(orders::remove_file))
        .route("/api/v1/orders/:id/next", post(orders::next))
        .route("/api/v1/orders/:id/back", post(orders::back))
        .route("/api/v1/orders/:id/reset", post(orders::reset))
        .route("/api/v1/orders/:id/confirm", post(orders::confirm))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
