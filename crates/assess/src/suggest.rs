use resolve::{EntityType, IdSequence};
use serde::{Deserialize, Serialize};
use verdict::Flag;

use crate::config::AssessmentConfig;
use crate::schema::{Assessment, AssessmentRequest};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionType {
    SourceRetry,
    MissingRole,
    NearThreshold,
    WeakHypothesis,
    UnexploredEntity,
    CommonName,
    Untranslated,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub priority: Priority,
    pub description: String,
    pub actionable: bool,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub related_entity: Option<String>,
}

/// Inspects the finished assessment for gaps and emits prioritized
/// next-action suggestions. Seven independent checks, each pure and
/// stateless given the snapshot.
pub struct SuggestionEngine<'a> {
    config: &'a AssessmentConfig,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(config: &'a AssessmentConfig) -> Self {
        Self { config }
    }

    pub fn suggest(
        &self,
        request: &AssessmentRequest,
        assessment: &Assessment,
        ids: &mut IdSequence,
    ) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        self.check_source_errors(request, assessment, ids, &mut suggestions);
        self.check_missing_roles(assessment, ids, &mut suggestions);
        self.check_near_threshold(assessment, ids, &mut suggestions);
        self.check_weak_hypotheses(assessment, ids, &mut suggestions);
        self.check_unexplored_entities(assessment, ids, &mut suggestions);
        self.check_common_names(assessment, ids, &mut suggestions);
        self.check_untranslated(request, ids, &mut suggestions);

        suggestions.sort_by_key(|s| s.priority);
        suggestions
    }

    fn check_source_errors(
        &self,
        request: &AssessmentRequest,
        assessment: &Assessment,
        ids: &mut IdSequence,
        out: &mut Vec<Suggestion>,
    ) {
        let errors: Vec<&String> = request
            .fetch_errors
            .iter()
            .chain(request.sanctions.errors.iter())
            .collect();
        if errors.is_empty() {
            return;
        }
        let verdict_note = if assessment.verdict.flag == Flag::Grey {
            " (the current verdict is GREY because of this)"
        } else {
            ""
        };
        out.push(Suggestion {
            id: ids.next_id(),
            suggestion_type: SuggestionType::SourceRetry,
            priority: Priority::High,
            description: format!(
                "{} external source(s) were unreachable or failed{verdict_note}",
                errors.len()
            ),
            actionable: true,
            action: Some("retry the failed source fetches and re-run the assessment".to_string()),
            related_entity: None,
        });
    }

    fn check_missing_roles(
        &self,
        assessment: &Assessment,
        ids: &mut IdSequence,
        out: &mut Vec<Suggestion>,
    ) {
        for entity in &assessment.entities {
            if entity.entity_type == EntityType::Person && entity.roles.is_empty() {
                out.push(Suggestion {
                    id: ids.next_id(),
                    suggestion_type: SuggestionType::MissingRole,
                    priority: Priority::Medium,
                    description: format!(
                        "\"{}\" was found but holds no known role; their function relative \
                         to the subject is unclear",
                        entity.name
                    ),
                    actionable: true,
                    action: Some(format!(
                        "search for \"{}\" together with title keywords",
                        entity.name
                    )),
                    related_entity: Some(entity.id.clone()),
                });
            }
        }
    }

    fn check_near_threshold(
        &self,
        assessment: &Assessment,
        ids: &mut IdSequence,
        out: &mut Vec<Suggestion>,
    ) {
        let info = &assessment.verdict.threshold_info;
        let near = match assessment.verdict.flag {
            Flag::Green => info.indicators_present + 1 >= 2,
            Flag::Yellow => info.credible_gap == 1,
            _ => false,
        };
        if !near {
            return;
        }
        out.push(Suggestion {
            id: ids.next_id(),
            suggestion_type: SuggestionType::NearThreshold,
            priority: Priority::High,
            description: format!(
                "the verdict sits one indicator away from the next tier ({:?})",
                assessment.verdict.flag
            ),
            actionable: true,
            action: Some(
                "review the unmet conditions in the threshold analysis before signing off"
                    .to_string(),
            ),
            related_entity: None,
        });
    }

    fn check_weak_hypotheses(
        &self,
        assessment: &Assessment,
        ids: &mut IdSequence,
        out: &mut Vec<Suggestion>,
    ) {
        for hypothesis in &assessment.hypotheses {
            if hypothesis.level == narrate::ConfidenceLevel::Low {
                out.push(Suggestion {
                    id: ids.next_id(),
                    suggestion_type: SuggestionType::WeakHypothesis,
                    priority: Priority::Low,
                    description: format!(
                        "hypothesis \"{}\" is low-confidence and needs corroboration",
                        hypothesis.description
                    ),
                    actionable: false,
                    action: None,
                    related_entity: hypothesis.related_entities.first().cloned(),
                });
            }
        }
    }

    fn check_unexplored_entities(
        &self,
        assessment: &Assessment,
        ids: &mut IdSequence,
        out: &mut Vec<Suggestion>,
    ) {
        for entity in &assessment.entities {
            let has_edges = assessment
                .graph
                .edges
                .iter()
                .any(|e| e.from == entity.id || e.to == entity.id);
            if entity.mentions >= self.config.high_mention_floor && !has_edges {
                out.push(Suggestion {
                    id: ids.next_id(),
                    suggestion_type: SuggestionType::UnexploredEntity,
                    priority: Priority::Medium,
                    description: format!(
                        "\"{}\" is mentioned {} times but has no graph connections",
                        entity.name, entity.mentions
                    ),
                    actionable: true,
                    action: Some(format!(
                        "fetch more text mentioning \"{}\" to establish its connections",
                        entity.name
                    )),
                    related_entity: Some(entity.id.clone()),
                });
            }
        }
    }

    fn check_common_names(
        &self,
        assessment: &Assessment,
        ids: &mut IdSequence,
        out: &mut Vec<Suggestion>,
    ) {
        for warning in &assessment.commonality_warnings {
            out.push(Suggestion {
                id: ids.next_id(),
                suggestion_type: SuggestionType::CommonName,
                priority: Priority::Medium,
                description: warning.message.clone(),
                actionable: true,
                action: Some(
                    "confirm identity via secondary identifiers before trusting list matches"
                        .to_string(),
                ),
                related_entity: None,
            });
        }
    }

    fn check_untranslated(
        &self,
        request: &AssessmentRequest,
        ids: &mut IdSequence,
        out: &mut Vec<Suggestion>,
    ) {
        for text in &request.texts {
            let foreign = !text.language.is_empty() && text.language != self.config.primary_language;
            if foreign && !text.translated {
                out.push(Suggestion {
                    id: ids.next_id(),
                    suggestion_type: SuggestionType::Untranslated,
                    priority: Priority::Low,
                    description: format!(
                        "text from \"{}\" is in \"{}\" and was not translated; mentions in it \
                         may have been missed",
                        text.source, text.language
                    ),
                    actionable: true,
                    action: Some("translate the source and re-run extraction".to_string()),
                    related_entity: None,
                });
            }
        }
    }
}
