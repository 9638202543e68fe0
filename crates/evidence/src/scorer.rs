use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::{EvidenceItem, ScoredEvidence, Severity, SourceType};

/// Fixed per-source-type trust score. Government and court records rank
/// highest; forums lowest; an unknown source is still worth something.
pub fn credibility_weight(source_type: SourceType) -> f64 {
    match source_type {
        SourceType::Government => 10.0,
        SourceType::Court => 9.0,
        SourceType::News => 7.0,
        SourceType::Ngo => 6.0,
        SourceType::Social => 3.0,
        SourceType::Forum => 2.0,
        SourceType::Unknown => 1.0,
    }
}

pub fn severity_multiplier(severity: Severity) -> f64 {
    match severity {
        Severity::High => 1.0,
        Severity::Medium => 0.7,
        Severity::Low => 0.4,
        Severity::Unspecified => 0.5,
    }
}

/// Scored items grouped with their per-category and overall totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceReport {
    pub scored: Vec<ScoredEvidence>,
    pub category_totals: HashMap<String, f64>,
    pub overall_total: f64,
    pub credible_count: usize,
}

impl EvidenceReport {
    pub fn is_empty(&self) -> bool {
        self.scored.is_empty()
    }
}

/// Assigns `weight × multiplier` scores and aggregates them.
pub struct EvidenceScorer;

impl EvidenceScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score_item(&self, item: EvidenceItem) -> ScoredEvidence {
        let weight = credibility_weight(item.source_type);
        let multiplier = severity_multiplier(item.severity);
        ScoredEvidence {
            weight,
            multiplier,
            score: weight * multiplier,
            item,
        }
    }

    pub fn score_all(&self, items: &[EvidenceItem]) -> EvidenceReport {
        let scored: Vec<ScoredEvidence> =
            items.iter().cloned().map(|i| self.score_item(i)).collect();

        let mut category_totals: HashMap<String, f64> = HashMap::new();
        let mut overall_total = 0.0;
        let mut credible_count = 0;

        for entry in &scored {
            *category_totals
                .entry(entry.item.category.clone())
                .or_insert(0.0) += entry.score;
            overall_total += entry.score;
            if entry.is_credible() {
                credible_count += 1;
            }
        }

        EvidenceReport {
            scored,
            category_totals,
            overall_total,
            credible_count,
        }
    }
}

impl Default for EvidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EvidenceStatus;

    fn item(source_type: SourceType, severity: Severity, category: &str) -> EvidenceItem {
        EvidenceItem {
            source_type,
            category: category.to_string(),
            severity,
            description: "test".to_string(),
            source: "test".to_string(),
            source_url: None,
            matched_name: None,
            status: EvidenceStatus::Unverified,
        }
    }

    #[test]
    fn test_government_high_scores_ten() {
        let scorer = EvidenceScorer::new();
        let scored = scorer.score_item(item(SourceType::Government, Severity::High, "sanctions"));

        assert_eq!(scored.weight, 10.0);
        assert_eq!(scored.score, 10.0);
        assert!(scored.is_credible());
    }

    #[test]
    fn test_severity_multipliers() {
        assert_eq!(severity_multiplier(Severity::High), 1.0);
        assert_eq!(severity_multiplier(Severity::Medium), 0.7);
        assert_eq!(severity_multiplier(Severity::Low), 0.4);
        assert_eq!(severity_multiplier(Severity::Unspecified), 0.5);
    }

    #[test]
    fn test_credible_tier_cut() {
        let scorer = EvidenceScorer::new();
        assert!(scorer.score_item(item(SourceType::Ngo, Severity::Low, "x")).is_credible());
        assert!(!scorer.score_item(item(SourceType::Social, Severity::High, "x")).is_credible());
    }

    #[test]
    fn test_aggregation_by_category() {
        let scorer = EvidenceScorer::new();
        let report = scorer.score_all(&[
            item(SourceType::News, Severity::High, "legal"),
            item(SourceType::News, Severity::Medium, "legal"),
            item(SourceType::Forum, Severity::Low, "reputation"),
        ]);

        assert!((report.category_totals["legal"] - 11.9).abs() < 1e-9);
        assert!((report.category_totals["reputation"] - 0.8).abs() < 1e-9);
        assert!((report.overall_total - 12.7).abs() < 1e-9);
        assert_eq!(report.credible_count, 2);
    }
}
