use regex::Regex;

/// Legal-entity suffixes stripped before comparing organization names.
const LEGAL_SUFFIXES: &[&str] = &[
    "inc", "incorporated", "llc", "ltd", "limited", "corp", "corporation",
    "co", "company", "gmbh", "ag", "sa", "plc", "bv", "nv", "srl", "spa",
    "oy", "ab", "as", "kk", "pty", "llp", "lp", "holdings", "group",
];

/// Normalizes names for equality checks: lowercase, diacritics folded,
/// punctuation stripped, whitespace collapsed, legal suffixes removed.
pub struct NameNormalizer {
    punctuation: Regex,
    whitespace: Regex,
}

impl NameNormalizer {
    pub fn new() -> Self {
        Self {
            punctuation: Regex::new(r#"[.,!?;:'"()\[\]{}«»、。]"#).unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    pub fn normalize(&self, name: &str) -> String {
        let mut normalized: String = name
            .to_lowercase()
            .chars()
            .map(fold_diacritic)
            .collect();

        normalized = self.punctuation.replace_all(&normalized, "").to_string();
        normalized = self
            .whitespace
            .replace_all(normalized.trim(), " ")
            .to_string();

        self.strip_legal_suffixes(&normalized)
    }

    fn strip_legal_suffixes(&self, name: &str) -> String {
        let mut words: Vec<&str> = name.split(' ').collect();

        // Strip from the end only, and never reduce a name to nothing.
        while words.len() > 1 {
            let last = words[words.len() - 1];
            if LEGAL_SUFFIXES.contains(&last) {
                words.pop();
            } else {
                break;
            }
        }

        words.join(" ")
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase without changing byte offsets: any character whose lowercase
/// form has a different UTF-8 length (e.g. 'İ', the Kelvin sign) is kept
/// as-is, so positions found in the folded text index the original
/// directly.
pub fn lowercase_preserving_offsets(text: &str) -> String {
    text.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) if l.len_utf8() == c.len_utf8() => l,
                _ => c,
            }
        })
        .collect()
}

/// Fold common Latin diacritics to their base character.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => 'i',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'š' | 'ś' => 's',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => 'u',
        'ý' | 'ÿ' => 'y',
        'ž' | 'ź' | 'ż' => 'z',
        'ß' => 's',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let normalizer = NameNormalizer::new();

        assert_eq!(normalizer.normalize("Acme Corp."), "acme");
        assert_eq!(normalizer.normalize("  Acme   Corp  "), "acme");
        assert_eq!(normalizer.normalize("ACME"), "acme");
    }

    #[test]
    fn test_diacritics_folded() {
        let normalizer = NameNormalizer::new();

        assert_eq!(normalizer.normalize("José Müller"), "jose muller");
        assert_eq!(normalizer.normalize("François"), "francois");
    }

    #[test]
    fn test_offset_preserving_fold_keeps_byte_length() {
        assert_eq!(lowercase_preserving_offsets("ACME Corp"), "acme corp");

        // 'İ' lowercases to two code points, the Kelvin sign to a shorter
        // one; both stay untouched so byte offsets line up.
        let original = "\u{130}stanbul \u{212A}elvin GmbH";
        let folded = lowercase_preserving_offsets(original);
        assert_eq!(folded.len(), original.len());
        assert!(folded.contains("stanbul"));
        assert!(folded.contains("elvin gmbh"));
    }

    #[test]
    fn test_legal_suffix_stripped_from_end_only() {
        let normalizer = NameNormalizer::new();

        assert_eq!(normalizer.normalize("Acme Holdings Ltd"), "acme");
        // "Co" inside a name is not a suffix.
        assert_eq!(normalizer.normalize("Co Op Markets"), "co op markets");
        // A name that is only a suffix word survives.
        assert_eq!(normalizer.normalize("Group"), "group");
    }
}
