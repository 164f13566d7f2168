//! # Rating Predictor
//!
//! Wraps the pre-trained dish classifier. The classifier is loaded from a
//! versioned JSON artifact and exposes its feature names, which define the
//! feature set for the whole application.
//!
//! ## Artifact layout
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "model": {
//!     "kind": "linear",
//!     "feature_names": ["milk", "honey"],
//!     "classes": ["bad", "so-so", "great"],
//!     "coefficients": [[0.1, -0.2], [0.0, 0.3], [0.4, 0.1]],
//!     "intercepts": [0.0, 0.1, -0.1]
//!   }
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::ModelError;
use crate::feature_vector::FeatureVector;

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// A label emitted by the classifier, verbatim from the artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Code(i64),
    Name(String),
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Code(code) => write!(f, "{code}"),
            ClassLabel::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Anything that can classify a feature vector
pub trait Classifier {
    /// Canonical ingredient names, in column order
    fn feature_names(&self) -> &[String];

    /// Predict a label for a vector aligned to `feature_names`
    fn predict(&self, vector: &FeatureVector) -> Result<ClassLabel, ModelError>;
}

/// On-disk artifact wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub model: ModelSpec,
}

/// Supported model kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear(LinearClassifier),
}

/// One-vs-rest linear classifier: highest `intercept + coef · x` wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub feature_names: Vec<String>,
    pub classes: Vec<ClassLabel>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearClassifier {
    /// Check that every class has a full coefficient row and an intercept
    pub fn validate(&self) -> Result<(), ModelError> {
        let k = self.feature_names.len();
        let classes = self.classes.len();

        if k == 0 {
            return Err(ModelError::Shape("model has no feature names".to_string()));
        }
        if classes == 0 {
            return Err(ModelError::Shape("model has no classes".to_string()));
        }
        if self.coefficients.len() != classes {
            return Err(ModelError::Shape(format!(
                "{} coefficient rows for {} classes",
                self.coefficients.len(),
                classes
            )));
        }
        if self.intercepts.len() != classes {
            return Err(ModelError::Shape(format!(
                "{} intercepts for {} classes",
                self.intercepts.len(),
                classes
            )));
        }
        if let Some((i, row)) = self
            .coefficients
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != k)
        {
            return Err(ModelError::Shape(format!(
                "coefficient row {i} has {} entries, expected {k}",
                row.len()
            )));
        }
        Ok(())
    }
}

impl Classifier for LinearClassifier {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, vector: &FeatureVector) -> Result<ClassLabel, ModelError> {
        if vector.len() != self.feature_names.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.feature_names.len(),
                actual: vector.len(),
            });
        }

        let mut best: Option<(usize, f64)> = None;
        for (i, (row, intercept)) in self.coefficients.iter().zip(&self.intercepts).enumerate() {
            let score = intercept
                + row
                    .iter()
                    .zip(vector.values())
                    .map(|(w, x)| w * x)
                    .sum::<f64>();
            if !score.is_finite() {
                return Err(ModelError::NonFiniteScore);
            }
            // Strict comparison keeps the first class on ties
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((i, score));
            }
        }

        best.map(|(i, _)| self.classes[i].clone())
            .ok_or_else(|| ModelError::Shape("model has no classes".to_string()))
    }
}

/// Load a classifier artifact from disk
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ModelError> {
    info!(path = %path.display(), "Loading rating model");

    let content = fs::read_to_string(path)
        .map_err(|e| ModelError::Artifact(format!("{}: {e}", path.display())))?;
    let artifact: ModelArtifact = serde_json::from_str(&content)
        .map_err(|e| ModelError::Artifact(format!("{}: {e}", path.display())))?;

    if artifact.format_version != SUPPORTED_FORMAT_VERSION {
        return Err(ModelError::UnsupportedVersion(artifact.format_version));
    }

    match artifact.model {
        ModelSpec::Linear(model) => {
            model.validate()?;
            info!(
                features = model.feature_names.len(),
                classes = model.classes.len(),
                "Rating model loaded"
            );
            Ok(Box::new(model))
        }
    }
}

/// Result of a rating prediction
#[derive(Debug, Clone, PartialEq)]
pub enum RatingOutcome {
    /// The classifier's own label
    Class(ClassLabel),
    /// No ingredient was recognized, so there was nothing to classify
    Unknown,
    /// The classifier failed internally
    Error(String),
}

impl fmt::Display for RatingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingOutcome::Class(label) => write!(f, "{label}"),
            RatingOutcome::Unknown => write!(f, "unknown"),
            RatingOutcome::Error(_) => write!(f, "error"),
        }
    }
}

/// Maps optional feature vectors to rating outcomes
pub struct RatingPredictor {
    classifier: Box<dyn Classifier>,
}

impl RatingPredictor {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn feature_names(&self) -> &[String] {
        self.classifier.feature_names()
    }

    pub fn predict(&self, vector: Option<&FeatureVector>) -> RatingOutcome {
        let Some(vector) = vector else {
            return RatingOutcome::Unknown;
        };

        match self.classifier.predict(vector) {
            Ok(label) => RatingOutcome::Class(label),
            Err(e) => {
                error!(error = %e, "Error during prediction");
                RatingOutcome::Error(e.to_string())
            }
        }
    }
}
