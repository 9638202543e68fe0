use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CommonalityEstimate {
    Low,
    High,
    VeryHigh,
}

/// Result of a commonality check on one full name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonalityWarning {
    pub name: String,
    pub estimate: CommonalityEstimate,
    pub message: String,
}

// Curated per-locale common-name sets. Deliberately small: the check only
// needs to catch names common enough that a bare sanctions match on them
// is weak evidence.
const COMMON_FIRST_NAMES: &[&str] = &[
    // western
    "john", "james", "robert", "michael", "david", "william", "richard",
    "thomas", "mary", "sarah", "anna", "maria", "peter", "paul", "mark",
    // arabic
    "mohammed", "muhammad", "mohamed", "ahmed", "ahmad", "ali", "omar",
    "hassan", "hussein", "ibrahim", "fatima", "aisha", "khalid", "said",
    // east asian
    "wei", "ming", "jun", "hiroshi", "takashi", "yuki", "min", "jin",
    // slavic
    "ivan", "dmitri", "sergei", "vladimir", "olga", "natalia", "andrei",
    // hispanic
    "jose", "juan", "carlos", "luis", "miguel", "antonio", "francisco",
];

const COMMON_LAST_NAMES: &[&str] = &[
    // western
    "smith", "johnson", "williams", "brown", "jones", "miller", "davis",
    "wilson", "taylor", "anderson", "thomas", "moore", "martin", "white",
    // arabic
    "khan", "ahmed", "ali", "hassan", "hussein", "rahman", "abdullah",
    "al-rashid", "ibrahim", "mahmoud",
    // east asian
    "wang", "li", "zhang", "liu", "chen", "yang", "kim", "lee", "park",
    "tanaka", "suzuki", "sato", "nguyen", "tran",
    // slavic
    "ivanov", "petrov", "smirnov", "kuznetsov", "popov", "novak",
    // hispanic
    "garcia", "rodriguez", "martinez", "hernandez", "lopez", "gonzalez",
    "perez", "sanchez", "silva", "santos",
];

/// Flags names too common to trust an identity match without secondary
/// identifiers. Annotates entities; never excludes them.
pub struct NameCommonalityChecker;

impl NameCommonalityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Check the first and last token of a full name against the curated
    /// sets. Returns `None` when neither token is common.
    pub fn check(&self, full_name: &str) -> Option<CommonalityWarning> {
        let tokens: Vec<String> = full_name
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();

        let first = tokens.first()?;
        let last = tokens.last()?;

        let first_common = COMMON_FIRST_NAMES.contains(&first.as_str());
        let last_common = COMMON_LAST_NAMES.contains(&last.as_str());

        let estimate = match (first_common, last_common) {
            (true, true) => CommonalityEstimate::VeryHigh,
            (true, false) | (false, true) => CommonalityEstimate::High,
            (false, false) => return None,
        };

        let message = match estimate {
            CommonalityEstimate::VeryHigh => format!(
                "\"{full_name}\" combines a very common first and last name; \
                 a list match on this name alone is weak without secondary \
                 identifiers (date of birth, nationality, known associates)"
            ),
            _ => format!(
                "\"{full_name}\" contains a common name element; verify list \
                 matches against secondary identifiers before relying on them"
            ),
            // Low never carries a warning.
        };

        Some(CommonalityWarning {
            name: full_name.to_string(),
            estimate,
            message,
        })
    }
}

impl Default for NameCommonalityChecker {
    fn default() -> Self {
        Self::new()
    }
}
