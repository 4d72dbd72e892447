pub mod normalize;
pub mod prediction;

pub use normalize::normalize;
pub use prediction::{Label, Prediction, Probabilities, round_probability};
