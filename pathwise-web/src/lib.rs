//! pathwise-web library - study path recommendation service
//!
//! JSON API over the recommendation pipeline plus account registration/login.

use axum::Router;
use pathwise_common::RecommendationService;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::ApiError;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded models and compatibility table, never mutated after startup
    pub service: Arc<RecommendationService>,
    /// User account database
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(service: Arc<RecommendationService>, db: SqlitePool) -> Self {
        Self { service, db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/interests", get(api::list_interests))
        .route("/api/select-interest", post(api::select_interest))
        .route("/api/validate-interest", post(api::validate_interest))
        .route("/api/result", get(api::get_result))
        .route("/api/register", post(api::register))
        .route("/api/login", post(api::login))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
