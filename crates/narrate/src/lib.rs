pub mod generator;
pub mod schema;

pub use generator::{GeneratorConfig, HypothesisGenerator};
pub use schema::{ConfidenceLevel, Hypothesis, HypothesisType};
