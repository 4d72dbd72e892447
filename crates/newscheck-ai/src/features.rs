//! TF-IDF feature extraction from a re-exported, pre-fitted vectoriser.
//!
//! The artifact carries the fitted vocabulary and idf weights plus the
//! vectoriser options that affect `transform`. Defaults match a freshly
//! constructed scikit-learn `TfidfVectorizer`.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ScoringError};

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse feature vector with a fixed dimension.
///
/// Entries are `(index, weight)` pairs sorted by index, with no zero weights.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build from arbitrary `(index, weight)` pairs.
    ///
    /// Duplicate indices are summed, zero weights dropped, and indices outside
    /// `dim` rejected.
    pub fn from_pairs(
        dim: usize,
        pairs: impl IntoIterator<Item = (usize, f64)>,
    ) -> Result<Self, ScoringError> {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for (index, weight) in pairs {
            if index >= dim {
                return Err(ScoringError::DimensionMismatch {
                    expected: dim,
                    actual: index + 1,
                });
            }
            *merged.entry(index).or_insert(0.0) += weight;
        }
        let entries = merged.into_iter().filter(|&(_, w)| w != 0.0).collect();
        Ok(Self { dim, entries })
    }

    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product with a dense weight vector of the same dimension.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries.iter().map(|&(i, w)| w * dense[i]).sum()
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(i, w) in &self.entries {
            dense[i] = w;
        }
        dense
    }
}

/// Maps a corpus of cleaned documents to feature vectors.
///
/// Implementations are immutable after construction and shared across requests.
pub trait FeatureExtractor: Send + Sync {
    /// Transform every document in `corpus`, one vector per document.
    fn transform(&self, corpus: &[&str]) -> Result<Vec<FeatureVector>, ScoringError>;

    /// Dimension of every vector this extractor produces.
    fn dim(&self) -> usize;
}

/// Row normalisation applied after idf weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk form of a fitted TF-IDF vectoriser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_true")]
    pub use_idf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl TfidfArtifact {
    /// An artifact with default options over the given vocabulary and idf.
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            ngram_range: default_ngram_range(),
            lowercase: true,
            token_pattern: default_token_pattern(),
            stop_words: Vec::new(),
            binary: false,
            sublinear_tf: false,
            use_idf: true,
            norm: default_norm(),
        }
    }
}

/// Pre-fitted TF-IDF vectoriser.
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    lowercase: bool,
    token_pattern: Regex,
    stop_words: HashSet<String>,
    binary: bool,
    sublinear_tf: bool,
    use_idf: bool,
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    /// Validate an artifact and build the vectoriser from it.
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self, ArtifactError> {
        let dim = artifact.idf.len();
        if dim == 0 {
            return Err(ArtifactError::Invalid("idf vector is empty".into()));
        }
        if let Some((term, &index)) = artifact.vocabulary.iter().find(|&(_, &i)| i >= dim) {
            return Err(ArtifactError::Invalid(format!(
                "vocabulary term {term:?} has index {index}, dimension is {dim}"
            )));
        }
        if artifact.idf.iter().any(|v| !v.is_finite()) {
            return Err(ArtifactError::Invalid("idf contains non-finite values".into()));
        }
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::Invalid(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        let token_pattern = Regex::new(&artifact.token_pattern)?;

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            ngram_range: artifact.ngram_range,
            lowercase: artifact.lowercase,
            token_pattern,
            stop_words: artifact.stop_words.into_iter().collect(),
            binary: artifact.binary,
            sublinear_tf: artifact.sublinear_tf,
            use_idf: artifact.use_idf,
            norm: artifact.norm,
        })
    }

    /// Split a document into the terms looked up in the vocabulary:
    /// tokens, minus stop words, expanded to word n-grams.
    fn analyze(&self, doc: &str) -> Vec<String> {
        let lowered;
        let doc = if self.lowercase {
            lowered = doc.to_lowercase();
            lowered.as_str()
        } else {
            doc
        };

        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(doc)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    fn transform_one(&self, doc: &str) -> Result<FeatureVector, ScoringError> {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for term in self.analyze(doc) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        let mut weights: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.binary {
                    1.0
                } else if self.sublinear_tf {
                    1.0 + f64::from(count).ln()
                } else {
                    f64::from(count)
                };
                let weight = if self.use_idf { tf * self.idf[index] } else { tf };
                (index, weight)
            })
            .collect();

        if let Some(norm) = self.norm {
            normalize_row(&mut weights, norm);
        }

        FeatureVector::from_pairs(self.idf.len(), weights)
    }
}

impl FeatureExtractor for TfidfVectorizer {
    fn transform(&self, corpus: &[&str]) -> Result<Vec<FeatureVector>, ScoringError> {
        corpus.iter().map(|doc| self.transform_one(doc)).collect()
    }

    fn dim(&self) -> usize {
        self.idf.len()
    }
}

fn normalize_row(weights: &mut [(usize, f64)], norm: Norm) {
    let total = match norm {
        Norm::L1 => weights.iter().map(|(_, w)| w.abs()).sum::<f64>(),
        Norm::L2 => weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
    };
    if total > 0.0 {
        for (_, w) in weights.iter_mut() {
            *w /= total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> HashMap<String, usize> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect()
    }

    fn vectorizer(artifact: TfidfArtifact) -> TfidfVectorizer {
        TfidfVectorizer::from_artifact(artifact).unwrap()
    }

    fn transform_single(v: &TfidfVectorizer, doc: &str) -> FeatureVector {
        let mut out = v.transform(&[doc]).unwrap();
        assert_eq!(out.len(), 1);
        out.remove(0)
    }

    #[test]
    fn counts_weighted_by_idf_then_l2_normalised() {
        let v = vectorizer(TfidfArtifact::new(
            vocab(&["fake", "news", "today"]),
            vec![1.0, 2.0, 3.0],
        ));
        let fv = transform_single(&v, "fake news fake");

        // Raw: fake = 2 * 1.0, news = 1 * 2.0, today = 0.
        let norm = (2.0f64 * 2.0 + 2.0 * 2.0).sqrt();
        assert_eq!(fv.dim(), 3);
        assert_eq!(fv.nnz(), 2);
        assert!((fv.get(0) - 2.0 / norm).abs() < 1e-12);
        assert!((fv.get(1) - 2.0 / norm).abs() < 1e-12);
        assert_eq!(fv.get(2), 0.0);
    }

    #[test]
    fn output_is_unit_length() {
        let v = vectorizer(TfidfArtifact::new(
            vocab(&["alpha", "beta", "gamma"]),
            vec![1.3, 2.1, 1.7],
        ));
        let fv = transform_single(&v, "alpha beta gamma gamma beta beta");
        let norm: f64 = fv.entries().iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12, "expected unit norm, got {norm}");
    }

    #[test]
    fn l1_norm_sums_to_one() {
        let mut artifact = TfidfArtifact::new(vocab(&["a1", "b2"]), vec![1.0, 3.0]);
        artifact.norm = Some(Norm::L1);
        let v = vectorizer(artifact);
        let fv = transform_single(&v, "a1 b2");
        assert!((fv.get(0) - 0.25).abs() < 1e-12);
        assert!((fv.get(1) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn no_norm_keeps_raw_tfidf() {
        let mut artifact = TfidfArtifact::new(vocab(&["word"]), vec![1.5]);
        artifact.norm = None;
        let v = vectorizer(artifact);
        let fv = transform_single(&v, "word word word");
        assert!((fv.get(0) - 4.5).abs() < 1e-12);
    }

    #[test]
    fn sublinear_and_binary_tf() {
        let mut artifact = TfidfArtifact::new(vocab(&["word"]), vec![1.0]);
        artifact.norm = None;
        artifact.sublinear_tf = true;
        let v = vectorizer(artifact.clone());
        let fv = transform_single(&v, "word word word");
        assert!((fv.get(0) - (1.0 + 3.0f64.ln())).abs() < 1e-12);

        artifact.sublinear_tf = false;
        artifact.binary = true;
        let v = vectorizer(artifact);
        let fv = transform_single(&v, "word word word");
        assert_eq!(fv.get(0), 1.0);
    }

    #[test]
    fn default_pattern_skips_single_char_tokens() {
        let v = vectorizer(TfidfArtifact::new(vocab(&["a", "is"]), vec![1.0, 1.0]));
        let fv = transform_single(&v, "a is a");
        assert_eq!(fv.get(0), 0.0);
        assert_eq!(fv.get(1), 1.0);
    }

    #[test]
    fn bigrams_are_space_joined() {
        let mut artifact = TfidfArtifact::new(
            vocab(&["breaking", "news", "breaking news"]),
            vec![1.0, 1.0, 1.0],
        );
        artifact.ngram_range = (1, 2);
        artifact.norm = None;
        let v = vectorizer(artifact);
        let fv = transform_single(&v, "breaking news");
        assert_eq!(fv.nnz(), 3);
        assert_eq!(fv.get(2), 1.0);
    }

    #[test]
    fn stop_words_removed_before_ngrams() {
        let mut artifact = TfidfArtifact::new(
            vocab(&["the", "cat sat", "cat the"]),
            vec![1.0, 1.0, 1.0],
        );
        artifact.ngram_range = (1, 2);
        artifact.stop_words = vec!["the".into()];
        artifact.norm = None;
        let v = vectorizer(artifact);
        let fv = transform_single(&v, "cat the sat");
        assert_eq!(fv.get(0), 0.0);
        assert_eq!(fv.get(1), 1.0);
        assert_eq!(fv.get(2), 0.0);
    }

    #[test]
    fn out_of_vocabulary_text_is_zero_vector() {
        let v = vectorizer(TfidfArtifact::new(vocab(&["known"]), vec![1.0]));
        assert_eq!(transform_single(&v, "entirely unknown words"), FeatureVector::zeros(1));
        assert_eq!(transform_single(&v, ""), FeatureVector::zeros(1));
    }

    #[test]
    fn transform_returns_one_vector_per_document() {
        let v = vectorizer(TfidfArtifact::new(vocab(&["one", "two"]), vec![1.0, 1.0]));
        let out = v.transform(&["one", "two", "three"]).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].nnz(), 0);
    }

    #[test]
    fn artifact_defaults_fill_missing_options() {
        let json = r#"{"vocabulary": {"news": 0}, "idf": [1.0]}"#;
        let artifact: TfidfArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.ngram_range, (1, 1));
        assert_eq!(artifact.norm, Some(Norm::L2));
        assert_eq!(artifact.token_pattern, DEFAULT_TOKEN_PATTERN);
        assert!(artifact.use_idf);

        let json = r#"{"vocabulary": {}, "idf": [1.0], "norm": null}"#;
        let artifact: TfidfArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.norm, None);
    }

    #[test]
    fn rejects_vocabulary_index_out_of_range() {
        let artifact = TfidfArtifact::new(vocab(&["a1", "b2"]), vec![1.0]);
        assert!(matches!(
            TfidfVectorizer::from_artifact(artifact),
            Err(ArtifactError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_bad_ngram_range_and_pattern() {
        let mut artifact = TfidfArtifact::new(vocab(&["a1"]), vec![1.0]);
        artifact.ngram_range = (2, 1);
        assert!(TfidfVectorizer::from_artifact(artifact.clone()).is_err());

        artifact.ngram_range = (1, 1);
        artifact.token_pattern = "(unclosed".into();
        assert!(matches!(
            TfidfVectorizer::from_artifact(artifact),
            Err(ArtifactError::TokenPattern(_))
        ));
    }

    #[test]
    fn feature_vector_merges_and_rejects() {
        let fv = FeatureVector::from_pairs(4, [(2, 1.0), (0, 0.5), (2, 1.0), (3, 0.0)]).unwrap();
        assert_eq!(fv.entries(), &[(0, 0.5), (2, 2.0)]);
        assert_eq!(fv.to_dense(), vec![0.5, 0.0, 2.0, 0.0]);
        assert_eq!(fv.dot(&[2.0, 9.0, 1.0, 9.0]), 3.0);

        assert!(FeatureVector::from_pairs(2, [(2, 1.0)]).is_err());
    }
}
