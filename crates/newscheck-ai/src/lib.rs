//! Inference layer: portable TF-IDF and linear-model artifacts, and the
//! prediction pipeline built on them.

pub mod artifacts;
pub mod classifier;
mod error;
pub mod features;
mod predictor;

pub use artifacts::{ArtifactPaths, ModelArtifacts};
pub use classifier::{Classifier, ClassifierArtifact};
pub use error::{ArtifactError, PredictError, ScoringError};
pub use features::{FeatureExtractor, FeatureVector, TfidfArtifact, TfidfVectorizer};
pub use predictor::{Predictor, TEXT_FIELD};
