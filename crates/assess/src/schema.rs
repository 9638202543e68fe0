use chrono::{DateTime, Utc};
use evidence::{EvidenceItem, EvidenceReport, SanctionsSummary};
use graph::{GraphMeta, NodeDegree, RiskGraph, VisGraph};
use narrate::Hypothesis;
use relate::DetectionResult;
use resolve::{CommonalityWarning, Entity, EntityType, RawMention, ResolutionSummary, RoleMention};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use verdict::FlagDecision;

use crate::suggest::Suggestion;

/// One text source with the mentions and role offsets extracted from it.
/// Roles are kept with their text so offsets stay meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInput {
    pub text: String,
    pub source: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub language: String,
    /// Whether a non-primary-language text has already been translated.
    #[serde(default)]
    pub translated: bool,
    #[serde(default)]
    pub mentions: Vec<RawMention>,
    #[serde(default)]
    pub roles: Vec<RoleMention>,
}

/// A pre-resolved entity supplied by the caller. Its confidence is forced
/// to 1.0 and it wins first-seen merge ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Everything the core consumes for one assessment, already acquired and
/// aggregated by the excluded collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub subject: String,
    #[serde(default)]
    pub texts: Vec<TextInput>,
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
    pub sanctions: SanctionsSummary,
    #[serde(default)]
    pub seeds: Vec<SeedEntity>,
    /// Upstream fetch failures, reported for suggestion purposes only.
    #[serde(default)]
    pub fetch_errors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("subject name must not be empty")]
    EmptySubject,
    // Not named `source`: thiserror would treat that field as the error
    // chain source and demand an Error impl from it.
    #[error("role offset {index} exceeds the length of text from \"{source_label}\" ({len} bytes)")]
    RoleOffsetOutOfBounds {
        source_label: String,
        index: usize,
        len: usize,
    },
}

impl AssessmentRequest {
    /// Boundary validation: malformed shape fails fast with a typed error;
    /// everything softer degrades to neutral defaults downstream.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.subject.trim().is_empty() {
            return Err(RequestError::EmptySubject);
        }
        for text in &self.texts {
            for role in &text.roles {
                if role.index > text.text.len() {
                    return Err(RequestError::RoleOffsetOutOfBounds {
                        source_label: text.source.clone(),
                        index: role.index,
                        len: text.text.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The finished assessment: every output bundle the core exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub assessment_id: Uuid,
    pub subject: String,
    pub generated_at: DateTime<Utc>,

    pub entities: Vec<Entity>,
    pub summaries: Vec<ResolutionSummary>,
    pub detection: DetectionResult,

    pub graph: RiskGraph,
    pub graph_meta: GraphMeta,
    pub centrality: Vec<NodeDegree>,
    pub visualization: VisGraph,

    pub evidence_report: EvidenceReport,
    pub verdict: FlagDecision,
    pub hypotheses: Vec<Hypothesis>,
    pub commonality_warnings: Vec<CommonalityWarning>,
    pub suggestions: Vec<Suggestion>,
}
