// URL classification pipeline: normalize, extract, scale, classify, round

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

use crate::models::features::FeatureVector;
use crate::models::prediction::ClassificationResult;
use crate::services::feature_extractor::FeatureExtractor;
use crate::services::scorer::{Scorer, ScorerError};

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Scoring failed: {0}")]
    Scoring(#[from] ScorerError),
}

#[derive(Clone)]
pub struct PredictionService {
    extractor: FeatureExtractor,
    scorer: Arc<Scorer>,
}

impl PredictionService {
    pub fn new(extractor: FeatureExtractor, scorer: Arc<Scorer>) -> Self {
        Self { extractor, scorer }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Classify a URL and return both class percentages.
    pub fn predict(&self, url: &str) -> Result<ClassificationResult, PredictionError> {
        let started = Instant::now();
        let features = self.features(url);
        let result = self.classify(&features)?;

        debug!(
            "Predicted {}: malicious={} benign={} ({:?})",
            url,
            result.malicious,
            result.benign,
            started.elapsed()
        );
        Ok(result)
    }

    /// Classify a raw JSON `url` value. Non-string values score the
    /// zero-filled schema.
    pub fn predict_value(
        &self,
        value: &serde_json::Value,
    ) -> Result<ClassificationResult, PredictionError> {
        match value.as_str() {
            Some(url) => self.predict(url),
            None => {
                debug!("Non-string url value, scoring empty feature vector");
                self.classify(&FeatureVector::zeroed())
            },
        }
    }

    /// Feature vector for the same normalized input `predict` would score.
    pub fn features(&self, url: &str) -> FeatureVector {
        self.extractor.extract(strip_trailing_slash(url))
    }

    /// Feature vector for a raw JSON `url` value.
    pub fn features_value(&self, value: &serde_json::Value) -> FeatureVector {
        match value.as_str() {
            Some(url) => self.features(url),
            None => self.extractor.extract_value(value),
        }
    }

    fn classify(&self, features: &FeatureVector) -> Result<ClassificationResult, PredictionError> {
        let (p_benign, p_malicious) = self.scorer.score(features)?;
        Ok(ClassificationResult::from_probabilities(p_benign, p_malicious))
    }
}

/// Drop one trailing `/`. Empty input is returned as-is.
pub fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
