//! Axum router setup for the Strata server

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{
    handlers::{analyze, cache_stats, deep_dive, health_check, summarize},
    state::AppState,
};

/// Create the axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/summarize", post(summarize))
        .route("/api/deep-dive", post(deep_dive))
        .route("/api/health", get(health_check))
        .route("/api/cache/stats", get(cache_stats))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
