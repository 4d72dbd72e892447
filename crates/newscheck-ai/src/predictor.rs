//! Request-level prediction: normalise, vectorise, score, shape the result.

use std::path::Path;

use newscheck_core::{Label, Prediction, Probabilities, normalize};
use serde_json::Value;
use tracing::debug;

use crate::artifacts::ModelArtifacts;
use crate::error::{ArtifactError, PredictError, ScoringError};
use crate::features::FeatureVector;

/// Name of the request field holding the article body.
pub const TEXT_FIELD: &str = "text";

/// Runs the full inference pipeline over the loaded artifacts.
pub struct Predictor {
    artifacts: ModelArtifacts,
}

impl Predictor {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self { artifacts }
    }

    /// Load artifacts from `dir` and wrap them.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        ModelArtifacts::load(dir).map(Self::new)
    }

    /// Predict from a JSON request payload carrying a `text` string.
    pub fn predict_from_request(&self, payload: &Value) -> Result<Prediction, PredictError> {
        let text = match payload.get(TEXT_FIELD) {
            None => return Err(PredictError::MissingField(TEXT_FIELD)),
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(PredictError::InvalidField {
                    field: TEXT_FIELD,
                    found: json_type_name(other),
                });
            }
        };
        Ok(self.predict_text(text)?)
    }

    /// Predict from raw article text.
    pub fn predict_text(&self, text: &str) -> Result<Prediction, ScoringError> {
        let features = self.features(text)?;
        let classifier = &self.artifacts.classifier;

        let class_index = classifier.predict(&features)?;
        let proba = classifier.predict_proba(&features)?;

        let prediction = Prediction {
            label: Label::from_class_index(class_index),
            probabilities: Probabilities::from_raw(proba),
        };
        debug!(
            label = %prediction.label,
            fake = prediction.probabilities.fake,
            real = prediction.probabilities.real,
            nnz = features.nnz(),
            "scored article"
        );
        Ok(prediction)
    }

    /// Normalise `text` and run it through the extractor as a one-document corpus.
    pub fn features(&self, text: &str) -> Result<FeatureVector, ScoringError> {
        let cleaned = normalize(text);
        let mut vectors = self.artifacts.extractor.transform(&[cleaned.as_str()])?;
        if vectors.len() != 1 {
            return Err(ScoringError::UnexpectedBatchSize(vectors.len()));
        }
        Ok(vectors.remove(0))
    }

    pub fn classifier_kind(&self) -> &'static str {
        self.artifacts.classifier.kind()
    }

    pub fn feature_dim(&self) -> usize {
        self.artifacts.extractor.dim()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
