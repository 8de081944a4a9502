// Request and response bodies for the detection API

use serde::{Deserialize, Serialize};

/// Body accepted by `POST /detect` and `POST /features`.
///
/// `url` is kept as a raw JSON value: non-string values are a legitimate
/// input and score as the zero-filled schema.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub url: serde_json::Value,
}

impl DetectRequest {
    /// A request without a usable `url` member (missing or `null`).
    pub fn is_missing_url(&self) -> bool {
        self.url.is_null()
    }
}

/// Percentages for both classes, each rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub malicious: f64,
    pub benign: f64,
}

impl ClassificationResult {
    /// Build from the classifier's probability pair.
    pub fn from_probabilities(p_benign: f64, p_malicious: f64) -> Self {
        Self {
            malicious: round_percent(p_malicious),
            benign: round_percent(p_benign),
        }
    }
}

/// `round(p * 100, 2)` the way numpy rounds a float64: scale by 100, round
/// half to even, scale back.
pub fn round_percent(probability: f64) -> f64 {
    let percent = probability * 100.0;
    (percent * 100.0).round_ties_even() / 100.0
}
