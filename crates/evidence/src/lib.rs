pub mod schema;
pub mod scorer;

pub use schema::{
    EvidenceItem, EvidenceStatus, SanctionsSourceResult, SanctionsSummary, ScoredEvidence,
    Severity, SourceType,
};
pub use scorer::{credibility_weight, severity_multiplier, EvidenceReport, EvidenceScorer};
