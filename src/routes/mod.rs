use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::Catalog;
use crate::middleware::request_id::request_id_middleware;
use crate::services::MovieService;

pub mod movies;

/// Shared application state
///
/// `service` is None when no TMDB API key is configured; the selector endpoint
/// still works off the catalog, enrichment endpoints report the missing
/// credential.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub service: Option<MovieService>,
    pub default_recommendation_count: usize,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/movies", get(movies::list))
        .route("/movies/details", get(movies::details))
        .route("/movies/recommendations", get(movies::recommendations))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
