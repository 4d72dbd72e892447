use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the model artifacts at startup. Always fatal.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid token pattern: {0}")]
    TokenPattern(#[from] regex::Error),

    #[error("classifier expects {classifier} features but extractor produces {extractor}")]
    DimensionMismatch { extractor: usize, classifier: usize },

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// Failure inside feature extraction or classification for one request.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("feature vector has dimension {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("feature extractor returned {0} vectors for one document")]
    UnexpectedBatchSize(usize),

    #[error("classifier produced a non-finite probability")]
    NonFinite,
}

/// Failure to produce a prediction for a request payload.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be a string, got {found}")]
    InvalidField {
        field: &'static str,
        found: &'static str,
    },

    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),
}
