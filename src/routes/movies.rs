use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::MovieDetails,
    routes::AppState,
    services::MovieService,
};

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    title: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    title: String,
    count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    pub movie: MovieDetails,
    /// Non-fatal enrichment problems, for the client to surface
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub movies: Vec<MovieDetails>,
    pub warnings: Vec<String>,
}

fn enrichment_service(state: &AppState) -> AppResult<&MovieService> {
    state.service.as_ref().ok_or(AppError::MissingCredential)
}

/// Handler for the movie selector: all catalog titles in catalog order
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.titles())
}

/// Handler for the details view of one movie
pub async fn details(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Json<DetailsResponse>> {
    let service = enrichment_service(&state)?;

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        "Processing details request"
    );

    let enriched = service.movie_details(&params.title).await?;
    Ok(Json(DetailsResponse {
        movie: enriched.details,
        warnings: enriched.warning.into_iter().collect(),
    }))
}

/// Handler for the recommendations view
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationsResponse>> {
    let service = enrichment_service(&state)?;
    let count = params.count.unwrap_or(state.default_recommendation_count);

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        count,
        "Processing recommendation request"
    );

    let set = service.recommendations(&params.title, count).await?;

    tracing::info!(
        request_id = %request_id,
        results = set.movies.len(),
        warnings = set.warnings.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationsResponse {
        movies: set.movies,
        warnings: set.warnings,
    }))
}
