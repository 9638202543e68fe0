pub mod classify;
pub mod comention;
pub mod detector;
pub mod schema;

pub use classify::ContextClassifier;
pub use detector::{DetectorConfig, RelationshipDetector, TextSource};
pub use schema::{
    Anomaly, AnomalyKind, AnomalySeverity, CoMentionRecord, DetectionResult, Relationship,
    RelationshipType, SUBJECT_ID,
};
