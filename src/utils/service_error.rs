// Service error type returned by the HTTP handlers
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::services::prediction::PredictionError;
use crate::services::scorer::ScorerError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found")]
    NotFound,

    #[error("Scoring error: {0}")]
    ScoringError(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServiceError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            ServiceError::ScoringError(msg) => {
                error!("Scoring failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to score URL".to_string(),
                )
            },
            ServiceError::UpstreamError(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

// Conversion from component error types
impl From<PredictionError> for ServiceError {
    fn from(error: PredictionError) -> Self {
        match error {
            PredictionError::Scoring(e) => ServiceError::from(e),
        }
    }
}

impl From<ScorerError> for ServiceError {
    fn from(error: ScorerError) -> Self {
        ServiceError::ScoringError(error.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for ServiceError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ServiceError::ValidationError(rejection.body_text())
    }
}
