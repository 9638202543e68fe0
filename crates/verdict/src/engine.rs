use evidence::{EvidenceReport, EvidenceStatus, SanctionsSummary, Severity, SourceType};
use narrate::{ConfidenceLevel, Hypothesis};
use tracing::debug;

use crate::schema::{Flag, FlagDecision, ThresholdInfo};

const CREDIBLE_RED_THRESHOLD: usize = 3;
const YELLOW_INDICATOR_MINIMUM: usize = 2;

/// The four RED triggers, evaluated once against the scored evidence and
/// the sanctions summary.
struct RedChecks {
    sanctions_match: bool,
    court_evidence: bool,
    gov_high_evidence: bool,
    credible_count: usize,
}

impl RedChecks {
    fn evaluate(report: &EvidenceReport, sanctions: &SanctionsSummary) -> Self {
        Self {
            sanctions_match: sanctions.sanctioned,
            court_evidence: report
                .scored
                .iter()
                .any(|e| e.item.source_type == SourceType::Court),
            gov_high_evidence: report.scored.iter().any(|e| {
                e.item.source_type == SourceType::Government && e.item.severity == Severity::High
            }),
            credible_count: report.credible_count,
        }
    }

    /// Conditions that hold, in priority order. The first becomes the
    /// stated reason; all of them become details.
    fn fired(&self) -> Vec<String> {
        let mut fired = Vec::new();
        if self.sanctions_match {
            fired.push("sanctions-list match present".to_string());
        }
        if self.court_evidence {
            fired.push("court-sourced evidence on record".to_string());
        }
        if self.gov_high_evidence {
            fired.push("high-severity government-sourced evidence on record".to_string());
        }
        if self.credible_count >= CREDIBLE_RED_THRESHOLD {
            fired.push(format!(
                "{} credible evidence items (threshold {})",
                self.credible_count, CREDIBLE_RED_THRESHOLD
            ));
        }
        fired
    }

    /// What would still have to happen for each unmet condition.
    fn unmet(&self) -> Vec<String> {
        let mut unmet = Vec::new();
        if !self.sanctions_match {
            unmet.push("a sanctions-list match would trigger RED".to_string());
        }
        if !self.court_evidence {
            unmet.push("any court-sourced evidence would trigger RED".to_string());
        }
        if !self.gov_high_evidence {
            unmet.push("high-severity government evidence would trigger RED".to_string());
        }
        if self.credible_count < CREDIBLE_RED_THRESHOLD {
            unmet.push(format!(
                "{} more credible evidence item(s) would trigger RED",
                CREDIBLE_RED_THRESHOLD - self.credible_count
            ));
        }
        unmet
    }

    fn credible_gap(&self) -> usize {
        CREDIBLE_RED_THRESHOLD.saturating_sub(self.credible_count)
    }
}

/// Deterministic, priority-ordered rule cascade picking one of four
/// verdicts. Evaluated once per assessment; no state survives calls.
pub struct FlagDecisionEngine;

impl FlagDecisionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn assign_flag(
        &self,
        report: &EvidenceReport,
        sanctions: &SanctionsSummary,
        hypotheses: &[Hypothesis],
    ) -> FlagDecision {
        let checks = RedChecks::evaluate(report, sanctions);
        let fired = checks.fired();

        let decision = if !fired.is_empty() {
            FlagDecision {
                flag: Flag::Red,
                reason: fired[0].clone(),
                severity: Flag::Red.severity_label().to_string(),
                threshold_info: ThresholdInfo {
                    current: Flag::Red,
                    // Already at the top tier.
                    to_escalate: Vec::new(),
                    to_deescalate: fired
                        .iter()
                        .map(|c| format!("clears only if no longer true: {c}"))
                        .collect(),
                    indicators_present: fired.len(),
                    credible_gap: 0,
                },
                details: fired,
            }
        } else {
            let indicators = self.yellow_indicators(report, hypotheses);
            if indicators.len() >= YELLOW_INDICATOR_MINIMUM {
                FlagDecision {
                    flag: Flag::Yellow,
                    reason: format!(
                        "{} independent risk indicators present",
                        indicators.len()
                    ),
                    severity: Flag::Yellow.severity_label().to_string(),
                    threshold_info: ThresholdInfo {
                        current: Flag::Yellow,
                        to_escalate: checks.unmet(),
                        to_deescalate: vec![format!(
                            "drops to GREEN if fewer than {YELLOW_INDICATOR_MINIMUM} indicators remain"
                        )],
                        indicators_present: indicators.len(),
                        credible_gap: checks.credible_gap(),
                    },
                    details: indicators,
                }
            } else if report.is_empty() && sanctions.all_failed() {
                FlagDecision {
                    flag: Flag::Grey,
                    reason: "insufficient data: no evidence collected and every sanctions check failed"
                        .to_string(),
                    details: sanctions.errors.clone(),
                    severity: Flag::Grey.severity_label().to_string(),
                    threshold_info: ThresholdInfo {
                        current: Flag::Grey,
                        to_escalate: Vec::new(),
                        to_deescalate: vec![
                            "re-evaluate once external sanctions sources are reachable".to_string(),
                        ],
                        indicators_present: 0,
                        credible_gap: checks.credible_gap(),
                    },
                }
            } else {
                let missing = YELLOW_INDICATOR_MINIMUM - indicators.len();
                let mut to_escalate = vec![format!(
                    "{missing} additional indicator type(s) would reach YELLOW"
                )];
                to_escalate.extend(checks.unmet().into_iter().map(|c| format!("immediate: {c}")));
                FlagDecision {
                    flag: Flag::Green,
                    reason: "no sanctions match and no indicator pattern found".to_string(),
                    severity: Flag::Green.severity_label().to_string(),
                    threshold_info: ThresholdInfo {
                        current: Flag::Green,
                        to_escalate,
                        to_deescalate: Vec::new(),
                        indicators_present: indicators.len(),
                        credible_gap: checks.credible_gap(),
                    },
                    details: indicators,
                }
            }
        };

        debug!(flag = ?decision.flag, reason = %decision.reason, "verdict assigned");
        decision
    }

    /// Distinct indicator categories, plus one indicator per
    /// high-confidence hypothesis.
    fn yellow_indicators(&self, report: &EvidenceReport, hypotheses: &[Hypothesis]) -> Vec<String> {
        let mut indicators = Vec::new();

        let has_source = |source_type: SourceType| {
            report
                .scored
                .iter()
                .any(|e| e.item.source_type == source_type)
        };
        if has_source(SourceType::News) {
            indicators.push("news coverage".to_string());
        }
        if has_source(SourceType::Ngo) {
            indicators.push("NGO reporting".to_string());
        }
        if has_source(SourceType::Forum) {
            indicators.push("forum chatter".to_string());
        }
        if report
            .scored
            .iter()
            .any(|e| e.item.status == EvidenceStatus::Pending)
        {
            indicators.push("pending verification".to_string());
        }
        for hypothesis in hypotheses {
            if hypothesis.level == ConfidenceLevel::High {
                indicators.push(format!(
                    "high-confidence hypothesis: {}",
                    hypothesis.description
                ));
            }
        }

        indicators
    }
}

impl Default for FlagDecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}
