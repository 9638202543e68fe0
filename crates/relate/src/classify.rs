use regex::Regex;

use crate::schema::RelationshipType;

const FINANCIAL_KEYWORDS: &[&str] = &[
    "payment", "paid", "transfer", "transferred", "account", "bank",
    "funds", "funding", "transaction", "invoice", "loan", "money",
    "wire", "shares", "stake", "investment", "investor", "financed",
];

const LEGAL_KEYWORDS: &[&str] = &[
    "court", "lawsuit", "sued", "investigation", "investigated", "charged",
    "arrested", "indicted", "trial", "fraud", "convicted", "raid",
    "probe", "subpoena", "prosecutor", "allegation", "fined",
];

/// Classifies a co-mention context into a relationship type by keyword
/// lexicon. Financial wins over organizational wins over event-based;
/// no match falls back to the generic co-mention.
pub struct ContextClassifier {
    organizational: Regex,
}

impl ContextClassifier {
    pub fn new() -> Self {
        Self {
            organizational: Regex::new(
                r"(?i)\b(ceo|cfo|coo|cto|chairman|chairwoman|director|founder|co-founder|president|manager|executive|board|owner|partner|subsidiary|employee|shareholder)\b",
            )
            .unwrap(),
        }
    }

    pub fn classify(&self, context: &str) -> RelationshipType {
        let lowered = context.to_lowercase();

        if FINANCIAL_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return RelationshipType::Financial;
        }
        if self.organizational.is_match(context) {
            return RelationshipType::Organizational;
        }
        if LEGAL_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return RelationshipType::EventBased;
        }
        RelationshipType::CoMention
    }
}

impl Default for ContextClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable edge label per type.
pub fn type_label(rel_type: RelationshipType) -> &'static str {
    match rel_type {
        RelationshipType::Organizational => "organizational link",
        RelationshipType::Financial => "financial link",
        RelationshipType::EventBased => "event link",
        RelationshipType::SanctionsLink => "sanctions link",
        RelationshipType::CoMention => "co-mentioned",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_context() {
        let classifier = ContextClassifier::new();
        assert_eq!(
            classifier.classify("Orlov transferred funds to Lopez"),
            RelationshipType::Financial
        );
    }

    #[test]
    fn test_organizational_context() {
        let classifier = ContextClassifier::new();
        assert_eq!(
            classifier.classify("Lopez, a Director at the firm, met Orlov"),
            RelationshipType::Organizational
        );
    }

    #[test]
    fn test_legal_context() {
        let classifier = ContextClassifier::new();
        assert_eq!(
            classifier.classify("both named in the fraud investigation"),
            RelationshipType::EventBased
        );
    }

    #[test]
    fn test_no_keywords_defaults_to_comention() {
        let classifier = ContextClassifier::new();
        assert_eq!(
            classifier.classify("Lopez and Orlov attended the gala"),
            RelationshipType::CoMention
        );
    }
}
