// Application state and configuration
use std::sync::Arc;

use crate::{
    app_config::AppConfig,
    services::{DomainAllowlist, PredictionService},
};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub allowlist: Arc<DomainAllowlist>,
    pub prediction_service: Arc<PredictionService>,
}
