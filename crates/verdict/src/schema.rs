use serde::{Deserialize, Serialize};

/// The four-valued assessment outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Flag {
    Red,
    Yellow,
    Green,
    /// Could not verify, as opposed to verified clean.
    Grey,
}

impl Flag {
    pub fn severity_label(&self) -> &'static str {
        match self {
            Flag::Red => "critical",
            Flag::Yellow => "elevated",
            Flag::Green => "low",
            Flag::Grey => "indeterminate",
        }
    }
}

/// Distance from the current verdict to the neighbouring tiers, and the
/// specific conditions that would trigger them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdInfo {
    pub current: Flag,
    /// What would move the verdict up a tier (empty for RED).
    pub to_escalate: Vec<String>,
    /// What would move the verdict down a tier, or how to resolve GREY.
    pub to_deescalate: Vec<String>,
    /// YELLOW indicators currently present.
    pub indicators_present: usize,
    /// Credible items still missing before the 3-credible-sources RED
    /// trigger fires (zero when already met or irrelevant).
    pub credible_gap: usize,
}

/// The verdict record: one flag, the first reason that fired, every
/// matching condition as a detail line, and the threshold analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagDecision {
    pub flag: Flag,
    pub reason: String,
    pub details: Vec<String>,
    pub severity: String,
    pub threshold_info: ThresholdInfo,
}
