use std::collections::HashMap;

use evidence::EvidenceItem;
use graph::RiskGraph;
use relate::{Anomaly, AnomalyKind, AnomalySeverity, RelationshipType};
use resolve::{CommonalityWarning, Entity, IdSequence};
use tracing::debug;

use crate::schema::{ConfidenceLevel, Hypothesis, HypothesisType};

pub struct GeneratorConfig {
    /// Hypotheses scoring below this are discarded.
    pub min_score: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { min_score: 0.2 }
    }
}

/// Synthesizes narrative hypotheses from the finished graph, evidence, and
/// cross-reference output. Four independent strategies, each free to emit
/// zero or more hypotheses.
pub struct HypothesisGenerator {
    config: GeneratorConfig,
}

impl HypothesisGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn generate(
        &self,
        subject_name: &str,
        graph: &RiskGraph,
        entities: &[Entity],
        anomalies: &[Anomaly],
        evidence_items: &[EvidenceItem],
        commonality: &HashMap<String, CommonalityWarning>,
        ids: &mut IdSequence,
    ) -> Vec<Hypothesis> {
        let mut hypotheses = Vec::new();

        hypotheses.extend(self.sanctions_proximity(subject_name, graph, evidence_items, ids));
        hypotheses.extend(self.organizational_links(subject_name, entities, ids));
        hypotheses.extend(self.financial_trails(graph, ids));
        hypotheses.extend(self.pattern_anomalies(anomalies, ids));

        // Annotate, never exclude: a common name lowers trust in a match
        // but the hypothesis stays.
        for hypothesis in &mut hypotheses {
            for entity_id in &hypothesis.related_entities {
                if let Some(warning) = commonality.get(entity_id) {
                    hypothesis.warnings.push(warning.message.clone());
                }
            }
        }

        hypotheses.retain(|h| h.score >= self.config.min_score);
        hypotheses.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(count = hypotheses.len(), "hypothesis generation complete");
        hypotheses
    }

    /// One hypothesis per sanctions-linked edge; confidence grows with the
    /// number of directly supporting evidence items.
    fn sanctions_proximity(
        &self,
        subject_name: &str,
        graph: &RiskGraph,
        evidence_items: &[EvidenceItem],
        ids: &mut IdSequence,
    ) -> Vec<Hypothesis> {
        graph
            .edges
            .iter()
            .filter(|e| e.rel_type == RelationshipType::SanctionsLink)
            .filter_map(|edge| {
                let entity_id = [edge.from.as_str(), edge.to.as_str()]
                    .into_iter()
                    .find(|id| *id != graph.subject_id)?;
                let entity_name = graph.node(entity_id).map(|n| n.label.clone())?;

                let supporting: Vec<String> = evidence_items
                    .iter()
                    .filter(|item| {
                        item.matched_name
                            .as_deref()
                            .is_some_and(|m| names_overlap(&entity_name, m))
                    })
                    .map(|item| item.description.clone())
                    .collect();

                let score = (0.6 + 0.1 * supporting.len() as f64).min(0.95);
                Some(self.hypothesis(
                    ids,
                    HypothesisType::SanctionsProximity,
                    score,
                    format!(
                        "{subject_name} is connected to \"{entity_name}\", which \
                         overlaps a sanctions-list entry"
                    ),
                    supporting,
                    vec![entity_id.to_string()],
                ))
            })
            .collect()
    }

    /// One hypothesis per entity holding at least one role.
    fn organizational_links(
        &self,
        subject_name: &str,
        entities: &[Entity],
        ids: &mut IdSequence,
    ) -> Vec<Hypothesis> {
        entities
            .iter()
            .filter(|e| !e.roles.is_empty())
            .map(|entity| {
                let score = (0.5 + 0.3 * entity.confidence).min(0.9);
                self.hypothesis(
                    ids,
                    HypothesisType::OrganizationalLink,
                    score,
                    format!(
                        "\"{}\" holds the role of {} in relation to {subject_name}",
                        entity.name,
                        entity.roles.join(", ")
                    ),
                    Vec::new(),
                    vec![entity.id.clone()],
                )
            })
            .collect()
    }

    /// One hypothesis per financial-typed edge.
    fn financial_trails(&self, graph: &RiskGraph, ids: &mut IdSequence) -> Vec<Hypothesis> {
        graph
            .edges
            .iter()
            .filter(|e| e.rel_type == RelationshipType::Financial)
            .map(|edge| {
                let name_of = |id: &str| {
                    graph
                        .node(id)
                        .map(|n| n.label.clone())
                        .unwrap_or_else(|| id.to_string())
                };
                let score = (0.4 + 0.3 * edge.confidence).min(0.85);
                self.hypothesis(
                    ids,
                    HypothesisType::FinancialTrail,
                    score,
                    format!(
                        "A financial trail may exist between \"{}\" and \"{}\"",
                        name_of(&edge.from),
                        name_of(&edge.to)
                    ),
                    edge.evidence.clone(),
                    vec![edge.from.clone(), edge.to.clone()],
                )
            })
            .collect()
    }

    /// One hypothesis per detected anomaly.
    fn pattern_anomalies(&self, anomalies: &[Anomaly], ids: &mut IdSequence) -> Vec<Hypothesis> {
        anomalies
            .iter()
            .map(|anomaly| {
                let score = match anomaly.kind {
                    AnomalyKind::CrossListPresence => 0.8,
                    AnomalyKind::FrequencySpike => match anomaly.severity {
                        AnomalySeverity::High => 0.6,
                        _ => 0.4,
                    },
                };
                self.hypothesis(
                    ids,
                    HypothesisType::PatternAnomaly,
                    score,
                    anomaly.description.clone(),
                    Vec::new(),
                    vec![anomaly.entity_id.clone()],
                )
            })
            .collect()
    }

    fn hypothesis(
        &self,
        ids: &mut IdSequence,
        hypothesis_type: HypothesisType,
        score: f64,
        description: String,
        supporting_evidence: Vec<String>,
        related_entities: Vec<String>,
    ) -> Hypothesis {
        Hypothesis {
            id: ids.next_id(),
            description,
            hypothesis_type,
            score,
            level: ConfidenceLevel::from_score(score),
            supporting_evidence,
            related_entities,
            warnings: Vec::new(),
        }
    }
}

impl Default for HypothesisGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

fn names_overlap(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidence::{EvidenceStatus, Severity, SourceType};
    use graph::GraphBuilder;
    use relate::Relationship;
    use resolve::{EntityType, ExtractionMethod, NameCommonalityChecker};

    fn entity(id: &str, name: &str, confidence: f64) -> Entity {
        Entity {
            id: id.to_string(),
            name: name.to_string(),
            normalized: name.to_lowercase(),
            entity_type: EntityType::Person,
            roles: Vec::new(),
            aliases: Vec::new(),
            methods: vec![ExtractionMethod::Nlp],
            confidence,
            mentions: 1,
            source: "test".to_string(),
        }
    }

    fn sanctions_item(matched: &str) -> EvidenceItem {
        EvidenceItem {
            source_type: SourceType::Government,
            category: "sanctions".to_string(),
            severity: Severity::High,
            description: format!("list entry for {matched}"),
            source: "OFAC".to_string(),
            source_url: None,
            matched_name: Some(matched.to_string()),
            status: EvidenceStatus::Confirmed,
        }
    }

    #[test]
    fn test_sanctions_proximity_boosted_by_support() {
        let orlov = entity("ent_1", "Viktor Orlov", 0.9);
        let mut rel = Relationship::between(
            "ent_1",
            "Viktor Orlov",
            "subject",
            "Acme Corp",
            RelationshipType::SanctionsLink,
        );
        rel.confidence = 0.9;
        let graph = GraphBuilder::new().build("Acme Corp", &[orlov.clone()], &[rel]);

        let items = vec![sanctions_item("Viktor Orlov"), sanctions_item("Orlov")];
        let mut ids = IdSequence::new("hyp");
        let hypotheses = HypothesisGenerator::default().generate(
            "Acme Corp",
            &graph,
            &[orlov],
            &[],
            &items,
            &HashMap::new(),
            &mut ids,
        );

        let sanctions: Vec<_> = hypotheses
            .iter()
            .filter(|h| h.hypothesis_type == HypothesisType::SanctionsProximity)
            .collect();
        assert_eq!(sanctions.len(), 1);
        // 0.6 + 2 supporting items.
        assert!((sanctions[0].score - 0.8).abs() < 1e-9);
        assert_eq!(sanctions[0].level, ConfidenceLevel::High);
        assert_eq!(sanctions[0].supporting_evidence.len(), 2);
    }

    #[test]
    fn test_organizational_link_formula() {
        let mut ceo = entity("ent_1", "Ahmed Al-Rashid", 0.9);
        ceo.roles.push("CEO".to_string());
        let graph = GraphBuilder::new().build("Acme Corp", &[ceo.clone()], &[]);

        let mut ids = IdSequence::new("hyp");
        let hypotheses = HypothesisGenerator::default().generate(
            "Acme Corp",
            &graph,
            &[ceo],
            &[],
            &[],
            &HashMap::new(),
            &mut ids,
        );

        assert_eq!(hypotheses.len(), 1);
        // min(0.5 + 0.3 * 0.9, 0.9) = 0.77
        assert!((hypotheses[0].score - 0.77).abs() < 1e-9);
        assert_eq!(hypotheses[0].level, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_anomaly_scores() {
        let anomaly = Anomaly {
            entity_id: "ent_1".to_string(),
            entity_name: "Viktor Orlov".to_string(),
            kind: AnomalyKind::CrossListPresence,
            severity: AnomalySeverity::High,
            description: "overlap".to_string(),
        };
        let graph = GraphBuilder::new().build("Acme Corp", &[], &[]);

        let mut ids = IdSequence::new("hyp");
        let hypotheses = HypothesisGenerator::default().generate(
            "Acme Corp",
            &graph,
            &[],
            &[anomaly],
            &[],
            &HashMap::new(),
            &mut ids,
        );

        assert_eq!(hypotheses[0].score, 0.8);
        assert_eq!(hypotheses[0].hypothesis_type, HypothesisType::PatternAnomaly);
    }

    #[test]
    fn test_commonality_warning_appended() {
        let mut smith = entity("ent_1", "John Smith", 0.9);
        smith.roles.push("director".to_string());
        let graph = GraphBuilder::new().build("Acme Corp", &[smith.clone()], &[]);

        let checker = NameCommonalityChecker::new();
        let mut warnings = HashMap::new();
        warnings.insert("ent_1".to_string(), checker.check("John Smith").unwrap());

        let mut ids = IdSequence::new("hyp");
        let hypotheses = HypothesisGenerator::default().generate(
            "Acme Corp",
            &graph,
            &[smith],
            &[],
            &[],
            &warnings,
            &mut ids,
        );

        assert_eq!(hypotheses[0].warnings.len(), 1);
        assert!(hypotheses[0].warnings[0].contains("John Smith"));
    }

    #[test]
    fn test_sorted_descending() {
        let mut ceo = entity("ent_1", "Ahmed Al-Rashid", 0.9);
        ceo.roles.push("CEO".to_string());
        let anomaly = Anomaly {
            entity_id: "ent_2".to_string(),
            entity_name: "Quiet Name".to_string(),
            kind: AnomalyKind::FrequencySpike,
            severity: AnomalySeverity::Medium,
            description: "spike".to_string(),
        };
        let graph = GraphBuilder::new().build("Acme Corp", &[ceo.clone()], &[]);

        let mut ids = IdSequence::new("hyp");
        let hypotheses = HypothesisGenerator::default().generate(
            "Acme Corp",
            &graph,
            &[ceo],
            &[anomaly],
            &[],
            &HashMap::new(),
            &mut ids,
        );

        assert_eq!(hypotheses.len(), 2);
        assert!(hypotheses[0].score >= hypotheses[1].score);
    }
}
