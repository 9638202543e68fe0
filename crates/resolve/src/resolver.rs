use crate::ids::IdSequence;
use crate::normalizer::{lowercase_preserving_offsets, NameNormalizer};
use crate::schema::{Entity, ExtractionMethod, RawMention, ResolutionSummary, RoleMention};
use crate::similarity::name_similarity;

pub struct ResolverConfig {
    /// Two names merge when similarity reaches this value.
    pub similarity_threshold: f64,
    /// Entities scoring below this are dropped.
    pub min_confidence: f64,
    /// Safety cap on entities returned per text.
    pub max_entities_per_text: usize,
    /// A role attaches only within this many characters of an entity mention.
    pub role_radius: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            min_confidence: 0.3,
            max_entities_per_text: 50,
            role_radius: 100,
        }
    }
}

/// Output of resolving one text source.
#[derive(Debug)]
pub struct TextResolution {
    pub entities: Vec<Entity>,
    pub summary: ResolutionSummary,
}

/// Merges raw name mentions into deduplicated canonical entities.
pub struct EntityResolver {
    config: ResolverConfig,
    normalizer: NameNormalizer,
}

impl EntityResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            normalizer: NameNormalizer::new(),
        }
    }

    /// Resolve the mentions of a single text source into entities, attach
    /// roles by offset proximity, score confidence, and filter.
    pub fn resolve_text(
        &self,
        text: &str,
        source: &str,
        mentions: &[RawMention],
        roles: &[RoleMention],
        ids: &mut IdSequence,
    ) -> TextResolution {
        let mut entities: Vec<Entity> = Vec::new();

        for mention in mentions {
            let normalized = self.normalizer.normalize(&mention.name);
            if normalized.is_empty() {
                continue;
            }

            match self.find_match(&entities, &normalized) {
                Some(idx) => self.merge_mention(&mut entities[idx], mention),
                None => entities.push(Entity {
                    id: ids.next_id(),
                    name: mention.name.trim().to_string(),
                    normalized,
                    entity_type: mention.entity_type,
                    roles: Vec::new(),
                    aliases: Vec::new(),
                    methods: vec![mention.extracted_by],
                    confidence: 0.0,
                    mentions: 1,
                    source: source.to_string(),
                }),
            }
        }

        let roles_attached = self.attach_roles(text, &mut entities, roles);

        for entity in &mut entities {
            entity.confidence = confidence_for(
                entity.has_method(ExtractionMethod::Nlp),
                entity.has_method(ExtractionMethod::Pattern),
                !entity.roles.is_empty(),
            );
        }

        let before = entities.len();
        entities.retain(|e| e.confidence >= self.config.min_confidence);
        entities.truncate(self.config.max_entities_per_text);

        let summary = ResolutionSummary {
            source: source.to_string(),
            mentions_seen: mentions.len(),
            entities_resolved: entities.len(),
            entities_dropped: before - entities.len(),
            roles_attached,
        };

        TextResolution { entities, summary }
    }

    /// Second pass: fold same-entity mentions found in different sources.
    /// Input order decides ties (first seen wins), so callers must hand
    /// entities over in a stable order.
    pub fn merge_across_sources(&self, entities: Vec<Entity>) -> Vec<Entity> {
        let mut merged: Vec<Entity> = Vec::new();

        for incoming in entities {
            match self.find_match(&merged, &incoming.normalized) {
                Some(idx) => merge_entities(&mut merged[idx], incoming),
                None => merged.push(incoming),
            }
        }

        merged
    }

    fn find_match(&self, entities: &[Entity], normalized: &str) -> Option<usize> {
        entities.iter().position(|e| {
            e.normalized == normalized
                || name_similarity(&e.normalized, normalized) >= self.config.similarity_threshold
        })
    }

    fn merge_mention(&self, entity: &mut Entity, mention: &RawMention) {
        entity.mentions += 1;

        let display = mention.name.trim();
        let had_nlp = entity.has_method(ExtractionMethod::Nlp);

        if !entity.methods.contains(&mention.extracted_by) {
            entity.methods.push(mention.extracted_by);
        }

        if mention.extracted_by == ExtractionMethod::Nlp && !had_nlp {
            // NLP spelling wins; keep the old one as an alias.
            if entity.name != display {
                push_unique(&mut entity.aliases, entity.name.clone());
                entity.name = display.to_string();
            }
        } else if entity.name != display {
            push_unique(&mut entity.aliases, display.to_string());
        }
    }

    /// Attach each role to the entity whose nearest textual occurrence is
    /// within the radius and closer than any competing entity. Ties favor
    /// the first entity scanned.
    fn attach_roles(&self, text: &str, entities: &mut [Entity], roles: &[RoleMention]) -> usize {
        if roles.is_empty() || entities.is_empty() {
            return 0;
        }

        let lowered = lowercase_preserving_offsets(text);
        let mut attached = 0;

        for role in roles {
            let mut best: Option<(usize, usize)> = None; // (entity idx, distance)

            for (idx, entity) in entities.iter().enumerate() {
                let Some(distance) = nearest_occurrence(&lowered, entity, role.index) else {
                    continue;
                };
                if distance > self.config.role_radius {
                    continue;
                }
                if best.map_or(true, |(_, d)| distance < d) {
                    best = Some((idx, distance));
                }
            }

            if let Some((idx, _)) = best {
                push_unique(&mut entities[idx].roles, role.role.clone());
                attached += 1;
            }
        }

        attached
    }
}

/// Fixed confidence lookup keyed by which signals agree on the entity.
fn confidence_for(has_nlp: bool, has_pattern: bool, has_role: bool) -> f64 {
    match (has_nlp, has_pattern, has_role) {
        (true, _, true) => 0.9,
        (true, true, false) => 0.85,
        (true, false, false) => 0.75,
        (false, true, true) => 0.7,
        (false, true, false) => 0.5,
        (false, false, _) => 0.3,
    }
}

/// Distance from `index` to the nearest occurrence of any spelling of the
/// entity in the (lowercased) text.
fn nearest_occurrence(lowered: &str, entity: &Entity, index: usize) -> Option<usize> {
    let mut nearest: Option<usize> = None;

    for name in entity.known_names() {
        let needle = lowercase_preserving_offsets(name);
        if needle.is_empty() {
            continue;
        }
        for (offset, _) in lowered.match_indices(&needle) {
            let distance = offset.abs_diff(index);
            if nearest.map_or(true, |d| distance < d) {
                nearest = Some(distance);
            }
        }
    }

    nearest
}

fn merge_entities(existing: &mut Entity, incoming: Entity) {
    existing.mentions += incoming.mentions;
    existing.confidence = existing.confidence.max(incoming.confidence);

    let had_nlp = existing.has_method(ExtractionMethod::Nlp);
    for method in &incoming.methods {
        if !existing.methods.contains(method) {
            existing.methods.push(*method);
        }
    }

    // Same display-name upgrade rule as within a text: an NLP spelling
    // replaces a pattern-only one, the loser is kept as an alias.
    if incoming.has_method(ExtractionMethod::Nlp) && !had_nlp && existing.name != incoming.name {
        push_unique(&mut existing.aliases, existing.name.clone());
        existing.name = incoming.name.clone();
    } else if existing.name != incoming.name {
        push_unique(&mut existing.aliases, incoming.name.clone());
    }

    for role in incoming.roles {
        push_unique(&mut existing.roles, role);
    }
    for alias in incoming.aliases {
        if alias != existing.name {
            push_unique(&mut existing.aliases, alias);
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.is_empty() && !list.contains(&value) {
        list.push(value);
    }
}
