// URL classification endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, warn};

use crate::{
    app::AppState,
    models::{
        features::FeatureVector,
        prediction::{ClassificationResult, DetectRequest},
    },
    utils::service_error::ServiceError,
};

// =============================================================================
// DETECTION HANDLERS
// =============================================================================

fn parse_request(
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<DetectRequest, ServiceError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected detection request: {}", rejection.body_text());
        ServiceError::from(rejection)
    })?;

    if request.is_missing_url() {
        return Err(ServiceError::ValidationError(
            "Request body must contain a 'url' field".to_string(),
        ));
    }
    Ok(request)
}

/// Classify a URL as malicious or benign
/// POST /detect
pub async fn detect(
    State(state): State<AppState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<ClassificationResult>, ServiceError> {
    let request = parse_request(payload)?;

    let result = state.prediction_service.predict_value(&request.url)?;

    info!(
        "Detection result: malicious={} benign={}",
        result.malicious, result.benign
    );
    Ok(Json(result))
}

/// Return the feature vector computed for a URL
/// POST /features
pub async fn features(
    State(state): State<AppState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<FeatureVector>, ServiceError> {
    let request = parse_request(payload)?;

    Ok(Json(state.prediction_service.features_value(&request.url)))
}
