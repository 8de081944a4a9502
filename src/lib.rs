// Library exports for the URL classifier backend
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, CONFIG};
pub use models::{ClassificationResult, DetectRequest, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use services::{
    DomainAllowlist, Extraction, FeatureExtractor, PredictionError, PredictionService, Scorer,
    ScorerError,
};

// Re-export route builders
pub use handlers::{admin_routes, detection_routes};

// Library initialization function
// Loads the model artifacts and performs the first allowlist fetch
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState, ScorerError> {
    use tracing::{info, warn};

    // Model artifacts are required; a bad artifact stops startup
    let scorer = Arc::new(Scorer::load(&config.model)?);

    let allowlist = Arc::new(DomainAllowlist::new(config.allowlist.clone()));
    match allowlist.load().await {
        Ok(count) => info!("Allowlist initialized with {} domains", count),
        Err(e) => warn!(
            "Starting with fallback allowlist ({} domains): {}",
            allowlist.len(),
            e
        ),
    }

    Ok(build_app_state(config.clone(), allowlist, scorer))
}

/// Wire services together around an existing allowlist and scorer.
pub fn build_app_state(
    config: AppConfig,
    allowlist: Arc<DomainAllowlist>,
    scorer: Arc<Scorer>,
) -> AppState {
    let extractor = FeatureExtractor::new(Arc::clone(&allowlist));
    let prediction_service = Arc::new(PredictionService::new(extractor, scorer));

    AppState {
        config: Arc::new(config),
        allowlist,
        prediction_service,
    }
}

/// Complete HTTP router with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(detection_routes())
        .nest("/admin", admin_routes())
        .layer(axum::middleware::from_fn(
            middleware::dynamic_cors_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::Json;

    let timestamp = chrono::Utc::now().to_rfc3339();

    // A failed allowlist fetch degrades accuracy but the service keeps answering
    let allowlist_status = state.allowlist.status();
    let allowlist_healthy =
        !state.allowlist.config().enabled || allowlist_status.last_error.is_none();
    let scorer = state.prediction_service.scorer();

    let response = serde_json::json!({
        "status": if allowlist_healthy { "healthy" } else { "degraded" },
        "service": "url-classifier-backend",
        "timestamp": timestamp,
        "components": {
            "model": {
                "status": "healthy",
                "scaler": scorer.scaler_kind(),
                "classifier": scorer.classifier_kind(),
            },
            "allowlist": {
                "status": if allowlist_healthy { "healthy" } else { "degraded" },
                "domain_count": state.allowlist.len(),
                "last_loaded_at": allowlist_status.last_loaded_at,
                "error": allowlist_status.last_error,
            }
        }
    });

    (StatusCode::OK, Json(response))
}
