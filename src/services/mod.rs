// Services module for the URL classifier backend
// Business logic layer for the application

pub mod allowlist;
pub mod feature_extractor;
pub mod prediction;
pub mod scorer;

// Re-export commonly used services
pub use allowlist::{spawn_allowlist_refresher, AllowlistError, AllowlistStatus, DomainAllowlist};
pub use feature_extractor::{Extraction, ExtractionError, FeatureExtractor};
pub use prediction::{PredictionError, PredictionService};
pub use scorer::{FeatureScaler, ProbabilisticClassifier, Scorer, ScorerError};
