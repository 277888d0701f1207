//! jop-api library - Catalog query service
//!
//! Read-only HTTP service over the catalog database: filtered episode
//! queries, a detail lookup, and the reference tables.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod query;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only in production)
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/episodes", get(api::list_episodes).post(api::list_episodes_body))
        .route("/api/episodes/:season/:episode", get(api::episode_detail))
        .route("/api/colors", get(api::list_colors))
        .route("/api/subjects", get(api::list_subjects))
        .route("/api/months", get(api::list_months))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
