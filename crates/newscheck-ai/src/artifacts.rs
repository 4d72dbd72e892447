//! Loading the two model artifacts from disk.
//!
//! Both files are JSON re-exports of the trained scikit-learn objects. They
//! live side by side in one artifacts directory.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::classifier::{Classifier, ClassifierArtifact};
use crate::error::ArtifactError;
use crate::features::{FeatureExtractor, TfidfArtifact, TfidfVectorizer};

pub const MODEL_FILE: &str = "news_verification_model.json";
pub const FEATURE_EXTRACTOR_FILE: &str = "tfidf_feature_extractor.json";

/// Paths of the classifier and feature extractor inside an artifacts directory.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub feature_extractor: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model: dir.join(MODEL_FILE),
            feature_extractor: dir.join(FEATURE_EXTRACTOR_FILE),
        }
    }
}

/// The fitted feature extractor and classifier, checked for compatibility.
pub struct ModelArtifacts {
    pub extractor: Box<dyn FeatureExtractor>,
    pub classifier: Box<dyn Classifier>,
}

impl ModelArtifacts {
    /// Load both artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        Self::load_paths(&ArtifactPaths::in_dir(dir))
    }

    pub fn load_paths(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let classifier: ClassifierArtifact = read_json(&paths.model)?;
        let extractor: TfidfArtifact = read_json(&paths.feature_extractor)?;
        let artifacts = Self::from_artifacts(extractor, classifier)?;

        info!(
            classifier = artifacts.classifier.kind(),
            features = artifacts.extractor.dim(),
            model = %paths.model.display(),
            "loaded model artifacts"
        );
        Ok(artifacts)
    }

    /// Build from already-parsed artifacts.
    pub fn from_artifacts(
        extractor: TfidfArtifact,
        classifier: ClassifierArtifact,
    ) -> Result<Self, ArtifactError> {
        let extractor = TfidfVectorizer::from_artifact(extractor)?;
        Self::new(Box::new(extractor), classifier.build()?)
    }

    /// Pair an extractor with a classifier, rejecting mismatched dimensions.
    pub fn new(
        extractor: Box<dyn FeatureExtractor>,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self, ArtifactError> {
        if extractor.dim() != classifier.dim() {
            return Err(ArtifactError::DimensionMismatch {
                extractor: extractor.dim(),
                classifier: classifier.dim(),
            });
        }
        Ok(Self {
            extractor,
            classifier,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
