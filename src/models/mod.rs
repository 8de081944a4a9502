pub mod features;
pub mod prediction;

// Re-export common types
pub use features::{FeatureVector, COUNTED_CHARS, FEATURE_COUNT, FEATURE_NAMES};
pub use prediction::{ClassificationResult, DetectRequest};
