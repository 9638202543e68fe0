pub mod config;
pub mod pipeline;
pub mod schema;
pub mod suggest;

pub use config::{AssessmentConfig, ConfigError};
pub use pipeline::Assessor;
pub use schema::{Assessment, AssessmentRequest, RequestError, SeedEntity, TextInput};
pub use suggest::{Priority, Suggestion, SuggestionType};
