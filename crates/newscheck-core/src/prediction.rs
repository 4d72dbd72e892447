//! Prediction payload returned to callers of the news checker.

use serde::{Deserialize, Serialize};

/// Predicted class for an article.
///
/// Class index 0 is `Fake`, index 1 is `Real`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Fake,
    Real,
}

impl Label {
    /// Map a classifier class index to a label. Anything but 1 is `Fake`.
    pub fn from_class_index(index: usize) -> Self {
        if index == 1 { Self::Real } else { Self::Fake }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fake => "Fake",
            Self::Real => "Real",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class probabilities, rounded to 3 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    #[serde(rename = "Fake")]
    pub fake: f64,
    #[serde(rename = "Real")]
    pub real: f64,
}

impl Probabilities {
    /// Build from raw `[p_fake, p_real]` classifier output, rounding each value.
    pub fn from_raw(raw: [f64; 2]) -> Self {
        Self {
            fake: round_probability(raw[0]),
            real: round_probability(raw[1]),
        }
    }
}

/// The response body of a successful prediction.
///
/// Serialises as `{"news-status": "Fake", "probabilities": {"Fake": .., "Real": ..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "news-status")]
    pub label: Label,
    pub probabilities: Probabilities,
}

/// Round to 3 decimal places, half to even (the rounding numpy applies).
pub fn round_probability(p: f64) -> f64 {
    (p * 1000.0).round_ties_even() / 1000.0
}
