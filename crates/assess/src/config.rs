use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every tunable default in one place, validated before any stage runs.
/// Stages never fall back on ad-hoc defaults of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Two names merge when similarity reaches this value.
    pub similarity_threshold: f64,
    /// Entities scoring below this are dropped during resolution.
    pub min_entity_confidence: f64,
    /// Safety cap on entities returned per text.
    pub max_entities_per_text: usize,
    /// A role attaches only within this many characters of a mention.
    pub role_radius: usize,
    /// Co-mention proximity window in characters.
    pub comention_window: usize,
    /// Co-mentions below this count are never promoted to a relationship.
    pub min_comention_occurrences: usize,
    /// Mention count must reach this multiple of the mean to flag a spike.
    pub spike_factor: f64,
    /// Hypotheses scoring below this are discarded.
    pub hypothesis_floor: f64,
    /// An unexplored entity is worth a suggestion from this many mentions.
    pub high_mention_floor: usize,
    /// Texts in any other language count as untranslated unless marked.
    pub primary_language: String,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            min_entity_confidence: 0.3,
            max_entities_per_text: 50,
            role_radius: 100,
            comention_window: 200,
            min_comention_occurrences: 2,
            spike_factor: 3.0,
            hypothesis_floor: 0.2,
            high_mention_floor: 3,
            primary_language: "en".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    NotAFraction { name: &'static str, value: f64 },
    #[error("{name} must be at least 1")]
    ZeroCount { name: &'static str },
    #[error("spike_factor must be greater than 1, got {0}")]
    SpikeFactorTooLow(f64),
    #[error("primary_language must not be empty")]
    EmptyLanguage,
}

impl AssessmentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fractions = [
            ("similarity_threshold", self.similarity_threshold),
            ("min_entity_confidence", self.min_entity_confidence),
            ("hypothesis_floor", self.hypothesis_floor),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::NotAFraction { name, value });
            }
        }

        let counts = [
            ("max_entities_per_text", self.max_entities_per_text),
            ("comention_window", self.comention_window),
            ("min_comention_occurrences", self.min_comention_occurrences),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(ConfigError::ZeroCount { name });
            }
        }

        if self.spike_factor <= 1.0 {
            return Err(ConfigError::SpikeFactorTooLow(self.spike_factor));
        }
        if self.primary_language.is_empty() {
            return Err(ConfigError::EmptyLanguage);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AssessmentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let mut config = AssessmentConfig::default();
        config.similarity_threshold = 1.2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotAFraction { name: "similarity_threshold", .. })
        ));
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = AssessmentConfig::default();
        config.comention_window = 0;
        assert!(config.validate().is_err());
    }
}
