use std::collections::HashMap;

use chrono::Utc;
use evidence::EvidenceScorer;
use graph::{degree_centrality, export_graph, DistanceDecayEngine, GraphBuilder};
use narrate::{GeneratorConfig, HypothesisGenerator};
use relate::{DetectorConfig, RelationshipDetector, TextSource};
use resolve::{
    CommonalityWarning, Entity, EntityResolver, EntityType, ExtractionMethod, IdSequence,
    NameCommonalityChecker, NameNormalizer, ResolverConfig,
};
use tracing::info;
use uuid::Uuid;
use verdict::FlagDecisionEngine;

use crate::config::{AssessmentConfig, ConfigError};
use crate::schema::{Assessment, AssessmentRequest, RequestError, SeedEntity};
use crate::suggest::SuggestionEngine;

/// All run-scoped mutable state, created fresh per assessment and owned
/// by the pipeline for its duration.
struct RunContext {
    entity_ids: IdSequence,
    hypothesis_ids: IdSequence,
    suggestion_ids: IdSequence,
}

impl RunContext {
    fn new() -> Self {
        Self {
            entity_ids: IdSequence::new("ent"),
            hypothesis_ids: IdSequence::new("hyp"),
            suggestion_ids: IdSequence::new("sug"),
        }
    }
}

/// Runs one assessment request end-to-end as a single synchronous batch.
pub struct Assessor {
    config: AssessmentConfig,
    resolver: EntityResolver,
    detector: RelationshipDetector,
    checker: NameCommonalityChecker,
    normalizer: NameNormalizer,
}

impl Assessor {
    pub fn new(config: AssessmentConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let resolver = EntityResolver::new(ResolverConfig {
            similarity_threshold: config.similarity_threshold,
            min_confidence: config.min_entity_confidence,
            max_entities_per_text: config.max_entities_per_text,
            role_radius: config.role_radius,
        });
        let detector = RelationshipDetector::new(DetectorConfig {
            window: config.comention_window,
            min_occurrences: config.min_comention_occurrences,
            spike_factor: config.spike_factor,
            ..DetectorConfig::default()
        });

        Ok(Self {
            config,
            resolver,
            detector,
            checker: NameCommonalityChecker::new(),
            normalizer: NameNormalizer::new(),
        })
    }

    pub fn assess(&self, request: &AssessmentRequest) -> Result<Assessment, RequestError> {
        request.validate()?;
        let mut ctx = RunContext::new();

        // 1. Entity resolution, per text then across sources. Seeds go in
        // first so they win first-seen merge ties.
        let mut pool: Vec<Entity> = request
            .seeds
            .iter()
            .map(|seed| self.seed_entity(seed, &mut ctx.entity_ids))
            .collect();
        let mut summaries = Vec::new();

        for text in &request.texts {
            let resolution = self.resolver.resolve_text(
                &text.text,
                &text.source,
                &text.mentions,
                &text.roles,
                &mut ctx.entity_ids,
            );
            pool.extend(resolution.entities);
            summaries.push(resolution.summary);
        }

        let entities = self.resolver.merge_across_sources(pool);
        info!(
            entities = entities.len(),
            texts = request.texts.len(),
            "entity resolution complete"
        );

        // 2. Name commonality, annotation only.
        let commonality: HashMap<String, CommonalityWarning> = entities
            .iter()
            .filter(|e| e.entity_type == EntityType::Person)
            .filter_map(|e| self.checker.check(&e.name).map(|w| (e.id.clone(), w)))
            .collect();

        // 3. Relationships and anomalies.
        let sources: Vec<TextSource> = request
            .texts
            .iter()
            .map(|t| TextSource {
                text: t.text.clone(),
                source: t.source.clone(),
            })
            .collect();
        let detection =
            self.detector
                .detect(&request.subject, &entities, &sources, &request.evidence);
        info!(
            relationships = detection.relationships.len(),
            anomalies = detection.anomalies.len(),
            "relationship detection complete"
        );

        // 4. Graph assembly and decay decoration.
        let built =
            GraphBuilder::new().build(&request.subject, &entities, &detection.relationships);
        let risk_graph = DistanceDecayEngine::new().decorate(built);
        let graph_meta = risk_graph.meta();
        let centrality = degree_centrality(&risk_graph);
        let visualization = export_graph(&risk_graph);
        info!(
            nodes = graph_meta.node_count,
            edges = graph_meta.edge_count,
            "graph built and decorated"
        );

        // 5. Evidence scoring.
        let evidence_report = EvidenceScorer::new().score_all(&request.evidence);

        // 6. Hypotheses.
        let generator = HypothesisGenerator::new(GeneratorConfig {
            min_score: self.config.hypothesis_floor,
        });
        let hypotheses = generator.generate(
            &request.subject,
            &risk_graph,
            &entities,
            &detection.anomalies,
            &request.evidence,
            &commonality,
            &mut ctx.hypothesis_ids,
        );

        // 7. Verdict.
        let verdict =
            FlagDecisionEngine::new().assign_flag(&evidence_report, &request.sanctions, &hypotheses);
        info!(flag = ?verdict.flag, hypotheses = hypotheses.len(), "verdict assigned");

        // Emit warnings in entity order, not map order, so identical
        // requests produce identical output.
        let commonality_warnings: Vec<CommonalityWarning> = entities
            .iter()
            .filter_map(|e| commonality.get(&e.id).cloned())
            .collect();

        let mut assessment = Assessment {
            assessment_id: Uuid::new_v4(),
            subject: request.subject.clone(),
            generated_at: Utc::now(),
            entities,
            summaries,
            detection,
            graph: risk_graph,
            graph_meta,
            centrality,
            visualization,
            evidence_report,
            verdict,
            hypotheses,
            commonality_warnings,
            suggestions: Vec::new(),
        };

        // 8. Suggestions over the finished snapshot.
        assessment.suggestions = SuggestionEngine::new(&self.config).suggest(
            request,
            &assessment,
            &mut ctx.suggestion_ids,
        );
        info!(suggestions = assessment.suggestions.len(), "assessment complete");

        Ok(assessment)
    }

    fn seed_entity(&self, seed: &SeedEntity, ids: &mut IdSequence) -> Entity {
        Entity {
            id: ids.next_id(),
            name: seed.name.clone(),
            normalized: self.normalizer.normalize(&seed.name),
            entity_type: seed.entity_type,
            roles: seed.roles.clone(),
            aliases: Vec::new(),
            methods: vec![ExtractionMethod::Seed],
            confidence: 1.0,
            mentions: 1,
            source: "seed".to_string(),
        }
    }
}
