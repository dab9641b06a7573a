use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::graph::keyword::KeywordGraphError;
use crate::graph::GraphError;
use crate::models::MediaError;
use crate::services::scoring::ScoreError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Keyword graph error: {0}")]
    KeywordGraph(#[from] KeywordGraphError),

    #[error("Invalid catalog entry: {0}")]
    Media(#[from] MediaError),

    #[error("Scoring error: {0}")]
    Score(#[from] ScoreError),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No viable candidates: {0}")]
    NoViableCandidates(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::NoViableCandidates(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Score(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Graph(_)
            | AppError::KeywordGraph(_)
            | AppError::Media(_)
            | AppError::Dataset(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
