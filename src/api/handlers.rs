use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{Category, Media};
use crate::services::recommendations::{get_recommendations, RankParams, ScoredMedia};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Titles the user has already watched, resolved against the reference
    /// libraries
    pub titles: Vec<String>,
    /// Maximum number of recommendations returned
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Candidates rated below this are excluded
    #[serde(default)]
    pub min_rating: Option<f64>,
    /// Candidates must carry every one of these genres
    #[serde(default)]
    pub genres: Vec<String>,
}

fn default_limit() -> usize {
    3
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendedTitle>,
    pub reference_titles: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RecommendedTitle {
    pub title: String,
    pub category: Category,
    pub genres: Vec<String>,
    pub rating: f64,
    pub release_year: i32,
    pub synopsis: String,
    pub score: f64,
}

impl From<&ScoredMedia> for RecommendedTitle {
    fn from(scored: &ScoredMedia) -> Self {
        // Genre sets are unordered; sort them so responses are stable
        let mut genres: Vec<String> = scored.media.genres.iter().cloned().collect();
        genres.sort();
        Self {
            title: scored.media.title.clone(),
            category: scored.media.category,
            genres,
            rating: scored.media.rating,
            release_year: scored.media.release_year,
            synopsis: scored.media.synopsis.clone(),
            score: scored.score,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    #[serde(default = "default_search_limit")]
    limit: usize,
}

fn default_search_limit() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct TitleSummary {
    pub title: String,
    pub category: Category,
    pub rating: f64,
    pub release_year: i32,
}

impl From<&Media> for TitleSummary {
    fn from(media: &Media) -> Self {
        Self {
            title: media.title.clone(),
            category: media.category,
            rating: media.rating,
            release_year: media.release_year,
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Generates ranked recommendations for a set of reference titles
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        titles = request.titles.len(),
        limit = request.limit,
        "Recommendation request received"
    );

    let reference_titles = request.titles.clone();
    let params = RankParams {
        titles: request.titles,
        limit: request.limit,
        min_rating: request.min_rating,
        required_genres: request.genres,
    };
    let scored = get_recommendations(Arc::clone(&state.catalogs), params).await?;

    Ok(Json(RecommendationResponse {
        recommendations: scored.iter().map(RecommendedTitle::from).collect(),
        reference_titles,
        generated_at: Utc::now(),
    }))
}

/// Searches the reference libraries by title substring
pub async fn search_titles(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<TitleSummary>>> {
    if params.q.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query must not be empty".to_string(),
        ));
    }

    let mut hits = state.catalogs.movies.search(&params.q, params.limit);
    hits.extend(state.catalogs.shows.search(&params.q, params.limit));
    hits.sort_by(|a, b| a.title.cmp(&b.title));
    hits.truncate(params.limit);

    tracing::debug!(query = %params.q, hits = hits.len(), "Title search");

    Ok(Json(hits.into_iter().map(TitleSummary::from).collect()))
}

/// Lists every genre in the candidate catalog
pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalogs.candidate_genres())
}
