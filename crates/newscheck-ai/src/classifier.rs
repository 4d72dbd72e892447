//! Binary linear classifiers re-exported from the training pipeline.
//!
//! Class index 0 is "Fake", index 1 is "Real". Every classifier exposes the
//! same two operations: `predict_proba` returning `[p0, p1]`, and `predict`
//! returning the winning class index.

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ScoringError};
use crate::features::FeatureVector;

/// A pre-trained two-class classifier. Immutable and shared across requests.
pub trait Classifier: Send + Sync {
    /// Class probabilities `[p_class0, p_class1]`, summing to 1.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ScoringError>;

    /// Winning class index; ties go to class 0.
    fn predict(&self, features: &FeatureVector) -> Result<usize, ScoringError> {
        let proba = self.predict_proba(features)?;
        Ok(argmax(proba))
    }

    /// Number of features this classifier was trained on.
    fn dim(&self) -> usize;

    /// Short identifier of the model family, e.g. `logistic_regression`.
    fn kind(&self) -> &'static str;
}

/// On-disk form of a trained classifier, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression {
        coef: Vec<f64>,
        intercept: f64,
    },
    MultinomialNb {
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    },
}

impl ClassifierArtifact {
    /// Validate parameters and build the matching classifier.
    pub fn build(self) -> Result<Box<dyn Classifier>, ArtifactError> {
        match self {
            Self::LogisticRegression { coef, intercept } => {
                Ok(Box::new(LogisticRegression::new(coef, intercept)?))
            }
            Self::MultinomialNb {
                class_log_prior,
                feature_log_prob,
            } => Ok(Box::new(MultinomialNb::new(class_log_prior, feature_log_prob)?)),
        }
    }
}

/// Binary logistic regression: `p1 = sigmoid(coef · x + intercept)`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coef: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Result<Self, ArtifactError> {
        if coef.is_empty() {
            return Err(ArtifactError::Invalid("logistic regression has no coefficients".into()));
        }
        if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid(
                "logistic regression has non-finite parameters".into(),
            ));
        }
        Ok(Self { coef, intercept })
    }

    /// Signed distance to the decision boundary; positive favours class 1.
    pub fn decision_function(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        check_dim(self.coef.len(), features)?;
        Ok(features.dot(&self.coef) + self.intercept)
    }
}

impl Classifier for LogisticRegression {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ScoringError> {
        let p1 = sigmoid(self.decision_function(features)?);
        finite([1.0 - p1, p1])
    }

    fn dim(&self) -> usize {
        self.coef.len()
    }

    fn kind(&self) -> &'static str {
        "logistic_regression"
    }
}

/// Multinomial naive Bayes over non-negative features.
#[derive(Debug, Clone)]
pub struct MultinomialNb {
    class_log_prior: [f64; 2],
    feature_log_prob: [Vec<f64>; 2],
}

impl MultinomialNb {
    pub fn new(
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    ) -> Result<Self, ArtifactError> {
        let dim = feature_log_prob[0].len();
        if dim == 0 || feature_log_prob[1].len() != dim {
            return Err(ArtifactError::Invalid(format!(
                "naive Bayes feature_log_prob rows have lengths {} and {}",
                feature_log_prob[0].len(),
                feature_log_prob[1].len()
            )));
        }
        let all_finite = class_log_prior.iter().all(|v| v.is_finite())
            && feature_log_prob.iter().flatten().all(|v| v.is_finite());
        if !all_finite {
            return Err(ArtifactError::Invalid(
                "naive Bayes has non-finite parameters".into(),
            ));
        }
        Ok(Self {
            class_log_prior,
            feature_log_prob,
        })
    }
}

impl Classifier for MultinomialNb {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ScoringError> {
        check_dim(self.dim(), features)?;
        let jll = [
            self.class_log_prior[0] + features.dot(&self.feature_log_prob[0]),
            self.class_log_prior[1] + features.dot(&self.feature_log_prob[1]),
        ];
        // Log-sum-exp keeps large negative log-likelihoods from underflowing.
        let max = jll[0].max(jll[1]);
        let log_norm = max + ((jll[0] - max).exp() + (jll[1] - max).exp()).ln();
        finite([(jll[0] - log_norm).exp(), (jll[1] - log_norm).exp()])
    }

    fn dim(&self) -> usize {
        self.feature_log_prob[0].len()
    }

    fn kind(&self) -> &'static str {
        "multinomial_nb"
    }
}

fn check_dim(expected: usize, features: &FeatureVector) -> Result<(), ScoringError> {
    if features.dim() != expected {
        return Err(ScoringError::DimensionMismatch {
            expected,
            actual: features.dim(),
        });
    }
    Ok(())
}

fn finite(proba: [f64; 2]) -> Result<[f64; 2], ScoringError> {
    if proba.iter().all(|p| p.is_finite()) {
        Ok(proba)
    } else {
        Err(ScoringError::NonFinite)
    }
}

fn argmax(proba: [f64; 2]) -> usize {
    if proba[1] > proba[0] { 1 } else { 0 }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
