use serde::{Deserialize, Serialize};

/// How a raw mention was found in the source text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Grammar-aware NLP extraction (higher trust).
    Nlp,
    /// Regex/pattern extraction.
    Pattern,
    /// Supplied by the caller as a pre-resolved seed.
    Seed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Organization,
}

/// A raw name mention as handed over by the extraction collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMention {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub extracted_by: ExtractionMethod,
    #[serde(default)]
    pub language: String,
    /// Id of the pattern that matched, if pattern-extracted.
    #[serde(default)]
    pub matched_by: Option<String>,
}

/// A role mention ("CEO", "director", ...) with its character offset
/// into the originating text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleMention {
    pub role: String,
    pub index: usize,
    #[serde(default)]
    pub language: String,
}

/// A deduplicated canonical person or organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    /// Canonical display name (best spelling seen so far).
    pub name: String,
    /// Lowercased, diacritic/punctuation-stripped form used for equality.
    pub normalized: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Inferred roles in the order they were attached.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Alternate spellings retained during merging.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Every extraction method that found this entity.
    pub methods: Vec<ExtractionMethod>,
    pub confidence: f64,
    pub mentions: usize,
    /// Label of the source the entity was first seen in.
    pub source: String,
}

impl Entity {
    pub fn has_method(&self, method: ExtractionMethod) -> bool {
        self.methods.contains(&method)
    }

    /// All spellings this entity is known under (display name first).
    pub fn known_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(|a| a.as_str()))
    }
}

/// Per-text counts reported back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub source: String,
    pub mentions_seen: usize,
    pub entities_resolved: usize,
    pub entities_dropped: usize,
    pub roles_attached: usize,
}
