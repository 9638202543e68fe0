use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HypothesisType {
    SanctionsProximity,
    OrganizationalLink,
    FinancialTrail,
    PatternAnomaly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// ≥0.8 high, ≥0.5 medium, else low.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            ConfidenceLevel::High
        } else if score >= 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// A narrative claim about the subject synthesized from the graph,
/// evidence, and cross-reference output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub hypothesis_type: HypothesisType,
    pub score: f64,
    pub level: ConfidenceLevel,
    pub supporting_evidence: Vec<String>,
    pub related_entities: Vec<String>,
    /// Only name-commonality cautions are ever appended here.
    pub warnings: Vec<String>,
}
