pub mod engine;
pub mod schema;

pub use engine::FlagDecisionEngine;
pub use schema::{Flag, FlagDecision, ThresholdInfo};
