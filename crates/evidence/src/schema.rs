use serde::{Deserialize, Serialize};

/// Where an evidence item came from. Unrecognized source strings fall back
/// to `Unknown` instead of failing deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Government,
    Court,
    News,
    Ngo,
    Social,
    Forum,
    #[serde(other)]
    Unknown,
}

/// Severity as reported by the source. Missing or unrecognized values fall
/// back to `Unspecified` (scored at the neutral 0.5 multiplier).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    #[serde(other)]
    Unspecified,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Unspecified
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceStatus {
    Confirmed,
    Pending,
    Unverified,
}

/// An atomic fact handed over by the acquisition collaborators. Immutable
/// once scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub source_type: SourceType,
    pub category: String,
    #[serde(default)]
    pub severity: Severity,
    pub description: String,
    pub source: String,
    #[serde(default)]
    pub source_url: Option<String>,
    /// Name a sanctions/watch list matched on, when applicable.
    #[serde(default)]
    pub matched_name: Option<String>,
    pub status: EvidenceStatus,
}

/// An evidence item plus its derived credibility fields. The wrapped item
/// is carried untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEvidence {
    #[serde(flatten)]
    pub item: EvidenceItem,
    pub weight: f64,
    pub multiplier: f64,
    pub score: f64,
}

impl ScoredEvidence {
    /// News/NGO/court/government tier.
    pub fn is_credible(&self) -> bool {
        self.weight >= 6.0
    }
}

/// Outcome of one external sanctions source check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsSourceResult {
    pub source: String,
    #[serde(default)]
    pub matches: Vec<String>,
}

/// Pre-aggregated sanctions-check outcome from the acquisition layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsSummary {
    pub sanctioned: bool,
    #[serde(default)]
    pub results: Vec<SanctionsSourceResult>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl SanctionsSummary {
    /// True when no source produced a result and at least one error was
    /// recorded: "could not verify", as opposed to "verified clean".
    pub fn all_failed(&self) -> bool {
        self.results.is_empty() && !self.errors.is_empty()
    }

    /// Every name any sanctions source matched on.
    pub fn matched_names(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .flat_map(|r| r.matches.iter().map(|m| m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_source_type_falls_back() {
        let item: EvidenceItem = serde_json::from_str(
            r#"{
                "source_type": "blog",
                "category": "reputation",
                "description": "x",
                "source": "s",
                "status": "unverified"
            }"#,
        )
        .unwrap();

        assert_eq!(item.source_type, SourceType::Unknown);
        assert_eq!(item.severity, Severity::Unspecified);
    }

    #[test]
    fn test_all_failed_requires_errors() {
        let empty = SanctionsSummary { sanctioned: false, results: vec![], errors: vec![] };
        assert!(!empty.all_failed());

        let failed = SanctionsSummary {
            sanctioned: false,
            results: vec![],
            errors: vec!["OFAC timeout".to_string()],
        };
        assert!(failed.all_failed());

        let partial = SanctionsSummary {
            sanctioned: false,
            results: vec![SanctionsSourceResult { source: "EU".to_string(), matches: vec![] }],
            errors: vec!["OFAC timeout".to_string()],
        };
        assert!(!partial.all_failed());
    }
}
