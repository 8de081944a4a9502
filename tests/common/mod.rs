// Common test utilities shared across integration test files

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;
use url_classifier_backend::{
    app_config::{AppConfig, ModelConfig},
    build_app_state, build_router,
    services::DomainAllowlist,
    Scorer, FEATURE_COUNT, FEATURE_NAMES,
};

/// Weights for the test logistic model, keyed by schema column.
pub const TEST_WEIGHTS: &[(&str, f64)] = &[
    ("has_ip_address", 3.0),
    ("has_suspicious_tld", 2.5),
    ("suspicious_words_count", 0.8),
    ("is_common_domain", -3.0),
    ("entropy", 0.2),
];
pub const TEST_INTERCEPT: f64 = -1.5;

/// Write a standard scaler and logistic regression artifact into `dir`.
///
/// The scaler lists its columns in reverse schema order to exercise
/// projection by name.
pub fn write_artifacts(dir: &TempDir) -> ModelConfig {
    let names: Vec<&str> = FEATURE_NAMES.iter().rev().copied().collect();
    let scaler = json!({
        "kind": "standard",
        "feature_names": names,
        "mean": vec![0.0; FEATURE_COUNT],
        "scale": vec![1.0; FEATURE_COUNT],
    });

    let mut coef = vec![0.0; FEATURE_COUNT];
    for (name, weight) in TEST_WEIGHTS {
        let index = names.iter().position(|n| n == name).unwrap();
        coef[index] = *weight;
    }
    let model = json!({
        "kind": "logistic_regression",
        "classes": [0, 1],
        "coef": coef,
        "intercept": TEST_INTERCEPT,
    });

    let scaler_path = dir.path().join("scaler.json");
    let model_path = dir.path().join("model.json");
    std::fs::write(&scaler_path, scaler.to_string()).unwrap();
    std::fs::write(&model_path, model.to_string()).unwrap();

    ModelConfig {
        model_path: model_path.display().to_string(),
        scaler_path: scaler_path.display().to_string(),
        malicious_class_label: 1,
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub allowlist: Arc<DomainAllowlist>,
    _artifacts: TempDir,
}

impl TestApp {
    /// Send a POST request with a JSON body
    pub async fn post_json<T: Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with a raw body
    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        TestResponse { response }
    }
}

/// Test response wrapper
pub struct TestResponse {
    response: Response<Body>,
}

impl TestResponse {
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    /// Parse JSON response
    pub async fn json(self) -> Value {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}

/// Default configuration with the given model artifacts.
pub fn test_config(model: ModelConfig) -> AppConfig {
    let mut config = AppConfig::from_env().expect("Failed to load test config");
    config.model = model;
    config
}

/// Build the full router around an in-memory allowlist.
pub fn setup_test_app(domains: &[&str]) -> TestApp {
    setup_test_app_with(Arc::new(DomainAllowlist::with_domains(domains)), |_| {})
}

/// Build the full router around a caller-provided allowlist, letting the
/// caller adjust the configuration first.
pub fn setup_test_app_with(
    allowlist: Arc<DomainAllowlist>,
    customize: impl FnOnce(&mut AppConfig),
) -> TestApp {
    let artifacts = TempDir::new().unwrap();
    let mut config = test_config(write_artifacts(&artifacts));
    customize(&mut config);

    let scorer = Arc::new(Scorer::load(&config.model).unwrap());
    let state = build_app_state(config, Arc::clone(&allowlist), scorer);

    TestApp {
        app: build_router(state),
        allowlist,
        _artifacts: artifacts,
    }
}
