// HTTP handlers for the URL classifier API

pub mod allowlist;
pub mod detect;

use crate::app::AppState;
use axum::{routing::post, Router};

// Classification routes
pub fn detection_routes() -> Router<AppState> {
    Router::new()
        .route("/detect", post(detect::detect))
        .route("/features", post(detect::features))
}

// Operator routes
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/allowlist/refresh", post(allowlist::refresh_allowlist))
}
