// Scoring boundary for the externally trained scaler and classifier
// Artifacts are exported offline as JSON; anything inconsistent fails at load time

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::app_config::ModelConfig;
use crate::models::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Classifier produced a non-finite probability")]
    NonFiniteOutput,
}

// =============================================================================
// CAPABILITY TRAITS
// =============================================================================

/// Trained transform applied to an ordered feature row before classification.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ScorerError>;
    fn n_features(&self) -> usize;
    fn kind(&self) -> &'static str;
}

/// Binary classifier returning one probability per class, in class order.
pub trait ProbabilisticClassifier: Send + Sync {
    fn predict_probabilities(&self, row: &[f64]) -> Result<[f64; 2], ScorerError>;
    fn n_features(&self) -> usize;
    fn kind(&self) -> &'static str;
}

fn check_len(row: &[f64], expected: usize) -> Result<(), ScorerError> {
    if row.len() != expected {
        return Err(ScorerError::DimensionMismatch {
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

// =============================================================================
// SCALERS
// =============================================================================

/// `(x - mean) / scale`
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScorerError> {
        if mean.len() != scale.len() {
            return Err(ScorerError::InvalidArtifact(format!(
                "standard scaler has {} means but {} scales",
                mean.len(),
                scale.len()
            )));
        }
        // Constant columns are stored with scale 0 and left unscaled
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();
        Ok(Self { mean, scale })
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ScorerError> {
        check_len(row, self.mean.len())?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }

    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn kind(&self) -> &'static str {
        "standard"
    }
}

/// `x * scale + min`
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    min: Vec<f64>,
    scale: Vec<f64>,
}

impl MinMaxScaler {
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScorerError> {
        if min.len() != scale.len() {
            return Err(ScorerError::InvalidArtifact(format!(
                "min-max scaler has {} offsets but {} scales",
                min.len(),
                scale.len()
            )));
        }
        Ok(Self { min, scale })
    }
}

impl FeatureScaler for MinMaxScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ScorerError> {
        check_len(row, self.min.len())?;
        Ok(row
            .iter()
            .zip(self.min.iter().zip(&self.scale))
            .map(|(x, (min, scale))| x * scale + min)
            .collect())
    }

    fn n_features(&self) -> usize {
        self.min.len()
    }

    fn kind(&self) -> &'static str {
        "min_max"
    }
}

// =============================================================================
// CLASSIFIERS
// =============================================================================

/// Binary logistic regression: `p1 = sigmoid(coef · x + intercept)`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coef: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Self {
        Self { coef, intercept }
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_probabilities(&self, row: &[f64]) -> Result<[f64; 2], ScorerError> {
        check_len(row, self.coef.len())?;
        let decision: f64 = row
            .iter()
            .zip(&self.coef)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept;
        let p1 = 1.0 / (1.0 + (-decision).exp());
        Ok([1.0 - p1, p1])
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn kind(&self) -> &'static str {
        "logistic_regression"
    }
}

/// One fitted decision tree in flat array form. A node is a leaf when its
/// left child is -1; internal nodes send `x[feature] <= threshold` left.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions)
    pub value: Vec<[f64; 2]>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize) -> Result<(), ScorerError> {
        let nodes = self.children_left.len();
        if nodes == 0 {
            return Err(ScorerError::InvalidArtifact("empty decision tree".to_string()));
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != nodes)
        {
            return Err(ScorerError::InvalidArtifact(
                "decision tree arrays have different lengths".to_string(),
            ));
        }

        for node in 0..nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == -1 {
                if self.value[node].iter().sum::<f64>() <= 0.0 {
                    return Err(ScorerError::InvalidArtifact(format!(
                        "leaf {} has no class weight",
                        node
                    )));
                }
                continue;
            }
            // Children always come after their parent, which also rules out cycles
            let in_range = |child: i64| child > node as i64 && (child as usize) < nodes;
            if !in_range(left) || !in_range(right) {
                return Err(ScorerError::InvalidArtifact(format!(
                    "node {} has out-of-range children",
                    node
                )));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(ScorerError::InvalidArtifact(format!(
                    "node {} splits on unknown feature {}",
                    node, feature
                )));
            }
        }
        Ok(())
    }

    fn leaf_distribution(&self, row: &[f64]) -> [f64; 2] {
        let mut node = 0usize;
        while self.children_left[node] != -1 {
            let feature = self.feature[node] as usize;
            // Trees are fitted on single-precision inputs
            let value = row[feature] as f32 as f64;
            node = if value <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        let [a, b] = self.value[node];
        let total = a + b;
        [a / total, b / total]
    }
}

/// Random forest: mean of the trees' normalized leaf distributions.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    pub fn new(trees: Vec<DecisionTree>, n_features: usize) -> Result<Self, ScorerError> {
        if trees.is_empty() {
            return Err(ScorerError::InvalidArtifact(
                "random forest has no trees".to_string(),
            ));
        }
        for tree in &trees {
            tree.validate(n_features)?;
        }
        Ok(Self { trees, n_features })
    }
}

impl ProbabilisticClassifier for RandomForest {
    fn predict_probabilities(&self, row: &[f64]) -> Result<[f64; 2], ScorerError> {
        check_len(row, self.n_features)?;
        let mut totals = [0.0, 0.0];
        for tree in &self.trees {
            let [a, b] = tree.leaf_distribution(row);
            totals[0] += a;
            totals[1] += b;
        }
        let n = self.trees.len() as f64;
        Ok([totals[0] / n, totals[1] / n])
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "random_forest"
    }
}

// =============================================================================
// ARTIFACT FILES
// =============================================================================

/// Scaler artifact as exported by the training pipeline.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMax {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl ScalerArtifact {
    fn build(self) -> Result<(Box<dyn FeatureScaler>, Option<Vec<String>>), ScorerError> {
        Ok(match self {
            ScalerArtifact::Standard {
                feature_names,
                mean,
                scale,
            } => (Box::new(StandardScaler::new(mean, scale)?), feature_names),
            ScalerArtifact::MinMax {
                feature_names,
                min,
                scale,
            } => (Box::new(MinMaxScaler::new(min, scale)?), feature_names),
        })
    }
}

/// Classifier artifact as exported by the training pipeline.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression {
        classes: Vec<i64>,
        coef: Vec<f64>,
        intercept: f64,
    },
    RandomForest {
        classes: Vec<i64>,
        n_features: usize,
        trees: Vec<DecisionTree>,
    },
}

impl ModelArtifact {
    fn build(self) -> Result<(Box<dyn ProbabilisticClassifier>, Vec<i64>), ScorerError> {
        Ok(match self {
            ModelArtifact::LogisticRegression {
                classes,
                coef,
                intercept,
            } => (Box::new(LogisticRegression::new(coef, intercept)), classes),
            ModelArtifact::RandomForest {
                classes,
                n_features,
                trees,
            } => (Box::new(RandomForest::new(trees, n_features)?), classes),
        })
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ScorerError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ScorerError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ScorerError::Json {
        path: display,
        source,
    })
}

// =============================================================================
// SCORER
// =============================================================================

pub struct Scorer {
    scaler: Box<dyn FeatureScaler>,
    classifier: Box<dyn ProbabilisticClassifier>,
    /// Schema index for each scaler input column
    projection: Vec<usize>,
    malicious_index: usize,
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("scaler", &self.scaler.kind())
            .field("classifier", &self.classifier.kind())
            .field("malicious_index", &self.malicious_index)
            .finish()
    }
}

impl Scorer {
    /// Load and validate both artifacts from the configured paths.
    pub fn load(config: &ModelConfig) -> Result<Self, ScorerError> {
        let scaler: ScalerArtifact = read_artifact(Path::new(&config.scaler_path))?;
        let model: ModelArtifact = read_artifact(Path::new(&config.model_path))?;

        let (scaler, feature_names) = scaler.build()?;
        let (classifier, classes) = model.build()?;
        let scorer = Self::new(
            scaler,
            feature_names,
            classifier,
            &classes,
            config.malicious_class_label,
        )?;

        info!(
            "Loaded {} scaler and {} classifier (malicious class index {})",
            scorer.scaler.kind(),
            scorer.classifier.kind(),
            scorer.malicious_index
        );
        Ok(scorer)
    }

    /// Assemble a scorer from already-built parts.
    ///
    /// `feature_names` is the column order the scaler was fitted with; `None`
    /// means the canonical schema order. `classes` are the classifier's
    /// labels in probability order.
    pub fn new(
        scaler: Box<dyn FeatureScaler>,
        feature_names: Option<Vec<String>>,
        classifier: Box<dyn ProbabilisticClassifier>,
        classes: &[i64],
        malicious_label: i64,
    ) -> Result<Self, ScorerError> {
        let projection = match feature_names {
            Some(names) => project_columns(&names)?,
            None => (0..FEATURE_COUNT).collect(),
        };

        if scaler.n_features() != FEATURE_COUNT {
            return Err(ScorerError::InvalidArtifact(format!(
                "scaler expects {} features, schema has {}",
                scaler.n_features(),
                FEATURE_COUNT
            )));
        }
        if classifier.n_features() != scaler.n_features() {
            return Err(ScorerError::InvalidArtifact(format!(
                "classifier expects {} features, scaler produces {}",
                classifier.n_features(),
                scaler.n_features()
            )));
        }

        if classes.len() != 2 || classes[0] == classes[1] {
            return Err(ScorerError::InvalidArtifact(format!(
                "expected two distinct classes, got {:?}",
                classes
            )));
        }
        let malicious_index = classes
            .iter()
            .position(|&label| label == malicious_label)
            .ok_or_else(|| {
                ScorerError::InvalidArtifact(format!(
                    "malicious label {} not among classes {:?}",
                    malicious_label, classes
                ))
            })?;

        Ok(Self {
            scaler,
            classifier,
            projection,
            malicious_index,
        })
    }

    /// Score a feature vector. Returns `(p_benign, p_malicious)`.
    pub fn score(&self, features: &FeatureVector) -> Result<(f64, f64), ScorerError> {
        let schema_row = features.to_row();
        let row: Vec<f64> = self.projection.iter().map(|&i| schema_row[i]).collect();

        let scaled = self.scaler.transform(&row)?;
        let probabilities = self.classifier.predict_probabilities(&scaled)?;

        let p_malicious = probabilities[self.malicious_index];
        let p_benign = probabilities[1 - self.malicious_index];
        if !p_malicious.is_finite() || !p_benign.is_finite() {
            return Err(ScorerError::NonFiniteOutput);
        }
        Ok((p_benign, p_malicious))
    }

    pub fn scaler_kind(&self) -> &'static str {
        self.scaler.kind()
    }

    pub fn classifier_kind(&self) -> &'static str {
        self.classifier.kind()
    }
}

/// Map artifact column names onto schema indices; every schema column must
/// appear exactly once.
fn project_columns(names: &[String]) -> Result<Vec<usize>, ScorerError> {
    if names.len() != FEATURE_COUNT {
        return Err(ScorerError::InvalidArtifact(format!(
            "artifact lists {} feature names, schema has {}",
            names.len(),
            FEATURE_COUNT
        )));
    }

    let mut seen = [false; FEATURE_COUNT];
    let mut projection = Vec::with_capacity(FEATURE_COUNT);
    for name in names {
        let index = FEATURE_NAMES
            .iter()
            .position(|schema_name| schema_name == name)
            .ok_or_else(|| ScorerError::InvalidArtifact(format!("unknown feature '{}'", name)))?;
        if seen[index] {
            return Err(ScorerError::InvalidArtifact(format!(
                "feature '{}' listed twice",
                name
            )));
        }
        seen[index] = true;
        projection.push(index);
    }
    Ok(projection)
}

// =============================================================================
// TESTS
// =============================================================================
