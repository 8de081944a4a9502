// Operator endpoint for reloading the safe-domain allowlist

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use tracing::{info, warn};

use crate::{app::AppState, services::allowlist::AllowlistError, utils::service_error::ServiceError};

/// Re-fetch the allowlist from its source
/// POST /admin/allowlist/refresh
pub async fn refresh_allowlist(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    if !state.config.allowlist.enable_refresh_endpoint {
        return Err(ServiceError::NotFound);
    }

    info!("Allowlist refresh requested");
    match state.allowlist.load().await {
        Ok(count) => {
            let status = state.allowlist.status();
            Ok(Json(json!({
                "status": "refreshed",
                "domain_count": count,
                "last_loaded_at": status.last_loaded_at,
            })))
        },
        Err(AllowlistError::Disabled) => Err(ServiceError::ValidationError(
            "Remote allowlist loading is disabled".to_string(),
        )),
        Err(e) => {
            warn!("Allowlist refresh failed, keeping previous domains: {}", e);
            Err(ServiceError::UpstreamError(format!(
                "Allowlist refresh failed: {}",
                e
            )))
        },
    }
}
