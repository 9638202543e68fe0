use serde::{Deserialize, Serialize};

/// Reserved node id for the subject organization.
pub const SUBJECT_ID: &str = "subject";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    Organizational,
    Financial,
    EventBased,
    SanctionsLink,
    /// The generic default; weakest confidence, upgraded away whenever a
    /// more specific type becomes available.
    CoMention,
}

impl RelationshipType {
    pub fn is_specific(&self) -> bool {
        *self != RelationshipType::CoMention
    }
}

/// An undirected, typed connection between two entity ids (or an entity
/// and the subject). At most one relationship exists per unordered pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Sorted endpoint ids; the dedup key.
    pub a: String,
    pub b: String,
    pub a_name: String,
    pub b_name: String,
    #[serde(rename = "type")]
    pub rel_type: RelationshipType,
    pub label: String,
    pub confidence: f64,
    /// Context snippets backing the relationship.
    pub evidence: Vec<String>,
    pub method: String,
}

impl Relationship {
    /// Build with endpoints in sorted order so (A,B) and (B,A) share a key.
    pub fn between(
        id_a: &str,
        name_a: &str,
        id_b: &str,
        name_b: &str,
        rel_type: RelationshipType,
    ) -> Self {
        let ((a, a_name), (b, b_name)) = if id_a <= id_b {
            ((id_a, name_a), (id_b, name_b))
        } else {
            ((id_b, name_b), (id_a, name_a))
        };
        Self {
            a: a.to_string(),
            b: b.to_string(),
            a_name: a_name.to_string(),
            b_name: b_name.to_string(),
            rel_type,
            label: String::new(),
            confidence: 0.0,
            evidence: Vec::new(),
            method: String::new(),
        }
    }

    pub fn pair_key(&self) -> (String, String) {
        (self.a.clone(), self.b.clone())
    }

    pub fn touches(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }

    /// The endpoint that is not the subject, if the other one is.
    pub fn non_subject_end(&self) -> Option<(&str, &str)> {
        if self.a == SUBJECT_ID {
            Some((self.b.as_str(), self.b_name.as_str()))
        } else if self.b == SUBJECT_ID {
            Some((self.a.as_str(), self.a_name.as_str()))
        } else {
            None
        }
    }
}

/// One raw co-occurrence of two entities inside the proximity window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoMentionRecord {
    pub a: String,
    pub b: String,
    pub source: String,
    pub offset_a: usize,
    pub offset_b: usize,
    /// Text captured around the pair, used for type classification.
    pub context: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AnomalyKind {
    FrequencySpike,
    CrossListPresence,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    High,
    Medium,
}

/// A statistical oddity reported independently of any relationship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub entity_id: String,
    pub entity_name: String,
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
    pub description: String,
}

/// Everything the detector produces for one assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub relationships: Vec<Relationship>,
    pub anomalies: Vec<Anomaly>,
    pub comentions: Vec<CoMentionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_sorts_endpoints() {
        let r1 = Relationship::between("ent_2", "B", "ent_1", "A", RelationshipType::CoMention);
        let r2 = Relationship::between("ent_1", "A", "ent_2", "B", RelationshipType::CoMention);
        assert_eq!(r1.pair_key(), r2.pair_key());
        assert_eq!(r1.a_name, "A");
    }
}
