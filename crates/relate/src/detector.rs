use std::collections::HashMap;

use evidence::EvidenceItem;
use resolve::{lowercase_preserving_offsets, Entity, EntityType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{type_label, ContextClassifier};
use crate::comention::scan_pair;
use crate::schema::{
    Anomaly, AnomalyKind, AnomalySeverity, CoMentionRecord, DetectionResult, Relationship,
    RelationshipType, SUBJECT_ID,
};

/// A text source as handed over by the acquisition layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSource {
    pub text: String,
    pub source: String,
}

pub struct DetectorConfig {
    /// Co-mention proximity window in characters.
    pub window: usize,
    /// Co-mentions below this count are never promoted to a relationship.
    pub min_occurrences: usize,
    /// Mention count must reach this multiple of the mean to flag a spike.
    pub spike_factor: f64,
    /// Above this multiple of the mean the spike is high severity.
    pub high_spike_factor: f64,
    /// Snippets kept per relationship.
    pub max_evidence_snippets: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window: 200,
            min_occurrences: 2,
            spike_factor: 3.0,
            high_spike_factor: 5.0,
            max_evidence_snippets: 3,
        }
    }
}

/// Finds co-mentions and proximity patterns among canonical entities,
/// classifies relationship types, and flags statistical anomalies.
pub struct RelationshipDetector {
    config: DetectorConfig,
    classifier: ContextClassifier,
}

impl RelationshipDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            classifier: ContextClassifier::new(),
        }
    }

    pub fn detect(
        &self,
        subject_name: &str,
        entities: &[Entity],
        sources: &[TextSource],
        evidence_items: &[EvidenceItem],
    ) -> DetectionResult {
        let comentions = self.scan_comentions(entities, sources);

        let mut relationships: Vec<Relationship> = Vec::new();
        for rel in self.promote_comentions(entities, &comentions) {
            merge_candidate(&mut relationships, rel);
        }
        for rel in self.link_roles(subject_name, entities) {
            merge_candidate(&mut relationships, rel);
        }
        for rel in self.cross_reference_sanctions(subject_name, entities, evidence_items) {
            merge_candidate(&mut relationships, rel);
        }

        let anomalies = self.detect_anomalies(entities, evidence_items);

        debug!(
            relationships = relationships.len(),
            anomalies = anomalies.len(),
            comentions = comentions.len(),
            "relationship detection complete"
        );

        DetectionResult {
            relationships,
            anomalies,
            comentions,
        }
    }

    fn scan_comentions(
        &self,
        entities: &[Entity],
        sources: &[TextSource],
    ) -> Vec<CoMentionRecord> {
        let mut records = Vec::new();

        for source in sources {
            let lowered = lowercase_preserving_offsets(&source.text);
            for i in 0..entities.len() {
                for j in (i + 1)..entities.len() {
                    records.extend(scan_pair(
                        &source.text,
                        &lowered,
                        &source.source,
                        &entities[i],
                        &entities[j],
                        self.config.window,
                    ));
                }
            }
        }

        records
    }

    /// Promote pairs whose occurrence count across all sources reaches the
    /// minimum. Confidence starts at 0.3, takes the largest applicable
    /// occurrence bump, and gains 0.2 for a specific type.
    fn promote_comentions(
        &self,
        entities: &[Entity],
        records: &[CoMentionRecord],
    ) -> Vec<Relationship> {
        let names: HashMap<&str, &str> = entities
            .iter()
            .map(|e| (e.id.as_str(), e.name.as_str()))
            .collect();

        let mut grouped: Vec<((String, String), Vec<&CoMentionRecord>)> = Vec::new();
        for record in records {
            let key = if record.a <= record.b {
                (record.a.clone(), record.b.clone())
            } else {
                (record.b.clone(), record.a.clone())
            };
            match grouped.iter_mut().find(|(k, _)| *k == key) {
                Some((_, list)) => list.push(record),
                None => grouped.push((key, vec![record])),
            }
        }

        let mut relationships = Vec::new();
        for ((id_a, id_b), group) in grouped {
            let count = group.len();
            if count < self.config.min_occurrences {
                continue;
            }

            // First specific classification wins; scan in record order.
            let mut rel_type = RelationshipType::CoMention;
            for record in &group {
                let classified = self.classifier.classify(&record.context);
                if classified.is_specific() {
                    rel_type = classified;
                    break;
                }
            }

            let mut confidence = 0.3 + occurrence_bump(count);
            if rel_type.is_specific() {
                confidence += 0.2;
            }

            let name_a = names.get(id_a.as_str()).copied().unwrap_or(id_a.as_str());
            let name_b = names.get(id_b.as_str()).copied().unwrap_or(id_b.as_str());

            let mut rel = Relationship::between(&id_a, name_a, &id_b, name_b, rel_type);
            rel.label = type_label(rel_type).to_string();
            rel.confidence = confidence.min(1.0);
            rel.evidence = group
                .iter()
                .take(self.config.max_evidence_snippets)
                .map(|r| r.context.clone())
                .collect();
            rel.method = "co-mention-scan".to_string();
            relationships.push(rel);
        }

        relationships
    }

    /// Any person holding at least one role links directly to the subject.
    fn link_roles(&self, subject_name: &str, entities: &[Entity]) -> Vec<Relationship> {
        entities
            .iter()
            .filter(|e| e.entity_type == EntityType::Person && !e.roles.is_empty())
            .map(|e| {
                let mut rel = Relationship::between(
                    &e.id,
                    &e.name,
                    SUBJECT_ID,
                    subject_name,
                    RelationshipType::Organizational,
                );
                rel.label = e.roles[0].clone();
                rel.confidence = e.confidence;
                rel.method = "role-linkage".to_string();
                rel
            })
            .collect()
    }

    /// Link entities whose name contains (or is contained in) a
    /// sanctions-matched name from the evidence list.
    fn cross_reference_sanctions(
        &self,
        subject_name: &str,
        entities: &[Entity],
        evidence_items: &[EvidenceItem],
    ) -> Vec<Relationship> {
        let mut relationships = Vec::new();

        for entity in entities {
            let supporting: Vec<&EvidenceItem> = evidence_items
                .iter()
                .filter(|item| {
                    item.matched_name
                        .as_deref()
                        .is_some_and(|m| names_overlap(&entity.name, m))
                })
                .collect();

            if supporting.is_empty() {
                continue;
            }

            let mut rel = Relationship::between(
                &entity.id,
                &entity.name,
                SUBJECT_ID,
                subject_name,
                RelationshipType::SanctionsLink,
            );
            rel.label = type_label(RelationshipType::SanctionsLink).to_string();
            rel.confidence = 0.9;
            rel.evidence = supporting
                .iter()
                .take(self.config.max_evidence_snippets)
                .map(|item| item.description.clone())
                .collect();
            rel.method = "sanctions-cross-reference".to_string();
            relationships.push(rel);
        }

        relationships
    }

    /// Frequency spikes and cross-list presence. Cross-list presence
    /// deliberately restates the sanctions-link signal from
    /// `cross_reference_sanctions` as an independent narrative cue; the
    /// two are produced by the same containment rule but reported apart.
    fn detect_anomalies(
        &self,
        entities: &[Entity],
        evidence_items: &[EvidenceItem],
    ) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();

        if !entities.is_empty() {
            let mean = entities.iter().map(|e| e.mentions as f64).sum::<f64>()
                / entities.len() as f64;

            for entity in entities {
                let count = entity.mentions as f64;
                if count >= mean * self.config.spike_factor && entity.mentions >= 3 {
                    let severity = if count > mean * self.config.high_spike_factor {
                        AnomalySeverity::High
                    } else {
                        AnomalySeverity::Medium
                    };
                    anomalies.push(Anomaly {
                        entity_id: entity.id.clone(),
                        entity_name: entity.name.clone(),
                        kind: AnomalyKind::FrequencySpike,
                        severity,
                        description: format!(
                            "\"{}\" is mentioned {} times against a mean of {:.1}",
                            entity.name, entity.mentions, mean
                        ),
                    });
                }
            }
        }

        for entity in entities {
            let hit = evidence_items.iter().find(|item| {
                item.matched_name
                    .as_deref()
                    .is_some_and(|m| names_overlap(&entity.name, m))
            });
            if let Some(item) = hit {
                anomalies.push(Anomaly {
                    entity_id: entity.id.clone(),
                    entity_name: entity.name.clone(),
                    kind: AnomalyKind::CrossListPresence,
                    severity: AnomalySeverity::High,
                    description: format!(
                        "\"{}\" overlaps list entry \"{}\"",
                        entity.name,
                        item.matched_name.as_deref().unwrap_or_default()
                    ),
                });
            }
        }

        anomalies
    }
}

impl Default for RelationshipDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

/// Largest applicable bump only, not a running sum: 3 occurrences score
/// 0.3 + 0.2, not 0.3 + 0.1 + 0.2.
fn occurrence_bump(count: usize) -> f64 {
    if count >= 5 {
        0.3
    } else if count >= 3 {
        0.2
    } else if count >= 2 {
        0.1
    } else {
        0.0
    }
}

/// Case-insensitive substring containment in either direction.
fn names_overlap(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

/// Fold a candidate into the list, keeping at most one relationship per
/// unordered pair: max confidence, concatenated evidence, and the type
/// upgraded away from co-mention when a specific one is available.
fn merge_candidate(relationships: &mut Vec<Relationship>, incoming: Relationship) {
    match relationships
        .iter_mut()
        .find(|r| r.a == incoming.a && r.b == incoming.b)
    {
        Some(existing) => {
            existing.confidence = existing.confidence.max(incoming.confidence);
            existing.evidence.extend(incoming.evidence);
            if !existing.rel_type.is_specific() && incoming.rel_type.is_specific() {
                existing.rel_type = incoming.rel_type;
                existing.label = incoming.label;
                existing.method = incoming.method;
            }
        }
        None => relationships.push(incoming),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidence::{EvidenceStatus, Severity, SourceType};
    use resolve::ExtractionMethod;

    fn entity(id: &str, name: &str, entity_type: EntityType) -> Entity {
        Entity {
            id: id.to_string(),
            name: name.to_string(),
            normalized: name.to_lowercase(),
            entity_type,
            roles: Vec::new(),
            aliases: Vec::new(),
            methods: vec![ExtractionMethod::Nlp],
            confidence: 0.75,
            mentions: 1,
            source: "test".to_string(),
        }
    }

    fn source(text: &str) -> TextSource {
        TextSource {
            text: text.to_string(),
            source: "news".to_string(),
        }
    }

    #[test]
    fn test_three_comentions_no_keywords_score_half() {
        let detector = RelationshipDetector::default();
        let entities = vec![
            entity("ent_1", "Maria Lopez", EntityType::Person),
            entity("ent_2", "Viktor Orlov", EntityType::Person),
        ];
        let sources = vec![
            source("Maria Lopez and Viktor Orlov attended."),
            source("Maria Lopez alongside Viktor Orlov again."),
            source("Viktor Orlov was seen with Maria Lopez."),
        ];

        let result = detector.detect("Acme Corp", &entities, &sources, &[]);
        assert_eq!(result.relationships.len(), 1);
        let rel = &result.relationships[0];
        assert_eq!(rel.rel_type, RelationshipType::CoMention);
        assert!((rel.confidence - 0.5).abs() < 1e-9);
        assert_eq!(result.comentions.len(), 3);
    }

    #[test]
    fn test_single_comention_not_promoted() {
        let detector = RelationshipDetector::default();
        let entities = vec![
            entity("ent_1", "Maria Lopez", EntityType::Person),
            entity("ent_2", "Viktor Orlov", EntityType::Person),
        ];
        let sources = vec![source("Maria Lopez and Viktor Orlov attended.")];

        let result = detector.detect("Acme Corp", &entities, &sources, &[]);
        assert!(result.relationships.is_empty());
        assert_eq!(result.comentions.len(), 1);
    }

    #[test]
    fn test_financial_context_upgrades_type() {
        let detector = RelationshipDetector::default();
        let entities = vec![
            entity("ent_1", "Maria Lopez", EntityType::Person),
            entity("ent_2", "Viktor Orlov", EntityType::Person),
        ];
        let sources = vec![
            source("Maria Lopez transferred funds to Viktor Orlov."),
            source("Maria Lopez paid Viktor Orlov."),
        ];

        let result = detector.detect("Acme Corp", &entities, &sources, &[]);
        let rel = &result.relationships[0];
        assert_eq!(rel.rel_type, RelationshipType::Financial);
        // 0.3 + 0.1 (two occurrences) + 0.2 (specific type)
        assert!((rel.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_role_holder_links_to_subject() {
        let detector = RelationshipDetector::default();
        let mut ceo = entity("ent_1", "Ahmed Al-Rashid", EntityType::Person);
        ceo.roles.push("CEO".to_string());
        ceo.confidence = 0.9;

        let result = detector.detect("Acme Corp", &[ceo], &[], &[]);
        assert_eq!(result.relationships.len(), 1);
        let rel = &result.relationships[0];
        assert_eq!(rel.rel_type, RelationshipType::Organizational);
        assert_eq!(rel.label, "CEO");
        assert_eq!(rel.confidence, 0.9);
        assert!(rel.touches(SUBJECT_ID));
        assert!(rel.touches("ent_1"));
    }

    #[test]
    fn test_sanctions_cross_reference_and_anomaly() {
        let detector = RelationshipDetector::default();
        let orlov = entity("ent_1", "Viktor Orlov", EntityType::Person);
        let item = EvidenceItem {
            source_type: SourceType::Government,
            category: "sanctions".to_string(),
            severity: Severity::High,
            description: "OFAC SDN entry".to_string(),
            source: "OFAC".to_string(),
            source_url: None,
            matched_name: Some("Viktor Orlov".to_string()),
            status: EvidenceStatus::Confirmed,
        };

        let result = detector.detect("Acme Corp", &[orlov], &[], &[item]);

        let rel = &result.relationships[0];
        assert_eq!(rel.rel_type, RelationshipType::SanctionsLink);
        assert_eq!(rel.confidence, 0.9);

        // The same fact surfaces again as a cross-list anomaly, on purpose.
        assert_eq!(result.anomalies.len(), 1);
        assert_eq!(result.anomalies[0].kind, AnomalyKind::CrossListPresence);
        assert_eq!(result.anomalies[0].severity, AnomalySeverity::High);
    }

    fn crowd(loud_mentions: usize) -> Vec<Entity> {
        let mut entities = vec![entity("ent_1", "Viktor Orlov", EntityType::Person)];
        entities[0].mentions = loud_mentions;
        for i in 2..=6 {
            entities.push(entity(&format!("ent_{i}"), &format!("Quiet Name {i}"), EntityType::Person));
        }
        entities
    }

    #[test]
    fn test_frequency_spike_medium() {
        let detector = RelationshipDetector::default();
        // mean = (6 + 5) / 6 ≈ 1.83; 6 clears 3x but not 5x.
        let result = detector.detect("Acme Corp", &crowd(6), &[], &[]);
        let spikes: Vec<_> = result
            .anomalies
            .iter()
            .filter(|a| a.kind == AnomalyKind::FrequencySpike)
            .collect();
        assert_eq!(spikes.len(), 1);
        assert_eq!(spikes[0].severity, AnomalySeverity::Medium);
    }

    #[test]
    fn test_frequency_spike_high() {
        let detector = RelationshipDetector::default();
        // mean = (30 + 5) / 6 ≈ 5.83; 30 clears 5x the mean.
        let result = detector.detect("Acme Corp", &crowd(30), &[], &[]);
        let spike = result
            .anomalies
            .iter()
            .find(|a| a.kind == AnomalyKind::FrequencySpike)
            .unwrap();
        assert_eq!(spike.severity, AnomalySeverity::High);
    }

    #[test]
    fn test_pair_merge_upgrades_comention() {
        let mut rels = Vec::new();
        let mut weak = Relationship::between("ent_1", "A", "ent_2", "B", RelationshipType::CoMention);
        weak.confidence = 0.5;
        weak.evidence = vec!["seen together".to_string()];
        merge_candidate(&mut rels, weak);

        let mut strong =
            Relationship::between("ent_2", "B", "ent_1", "A", RelationshipType::Financial);
        strong.confidence = 0.4;
        strong.evidence = vec!["paid".to_string()];
        strong.label = "financial link".to_string();
        merge_candidate(&mut rels, strong);

        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].rel_type, RelationshipType::Financial);
        assert_eq!(rels[0].confidence, 0.5);
        assert_eq!(rels[0].evidence.len(), 2);
    }
}
