use resolve::{lowercase_preserving_offsets, Entity};

use crate::schema::CoMentionRecord;

/// All byte offsets of `needle` in `haystack`, both already case-folded
/// with `lowercase_preserving_offsets`.
pub fn find_occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    haystack.match_indices(needle).map(|(i, _)| i).collect()
}

/// Scan one text source for co-mentions of an entity pair: any two
/// non-identical offsets within the window produce a record. `lowered`
/// must come from `lowercase_preserving_offsets` so its offsets index
/// `text` directly.
pub fn scan_pair(
    text: &str,
    lowered: &str,
    source: &str,
    a: &Entity,
    b: &Entity,
    window: usize,
) -> Vec<CoMentionRecord> {
    let offsets_a = entity_offsets(lowered, a);
    if offsets_a.is_empty() {
        return Vec::new();
    }
    let offsets_b = entity_offsets(lowered, b);

    let mut records = Vec::new();
    for &oa in &offsets_a {
        for &ob in &offsets_b {
            if oa == ob {
                continue;
            }
            if oa.abs_diff(ob) <= window {
                records.push(CoMentionRecord {
                    a: a.id.clone(),
                    b: b.id.clone(),
                    source: source.to_string(),
                    offset_a: oa,
                    offset_b: ob,
                    context: capture_context(text, oa.min(ob), oa.max(ob), window),
                });
            }
        }
    }
    records
}

fn entity_offsets(lowered: &str, entity: &Entity) -> Vec<usize> {
    let mut offsets = Vec::new();
    for name in entity.known_names() {
        offsets.extend(find_occurrences(lowered, &lowercase_preserving_offsets(name)));
    }
    offsets.sort_unstable();
    offsets.dedup();
    offsets
}

/// Slice the text spanning both offsets plus some margin, clamped to char
/// boundaries so multi-byte text cannot split a code point.
fn capture_context(text: &str, start: usize, end: usize, margin: usize) -> String {
    let from = floor_char_boundary(text, start.saturating_sub(margin / 4));
    let to = ceil_char_boundary(text, (end + margin / 2).min(text.len()));
    text[from..to].to_string()
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use resolve::{EntityType, ExtractionMethod};

    fn entity(id: &str, name: &str) -> Entity {
        Entity {
            id: id.to_string(),
            name: name.to_string(),
            normalized: name.to_lowercase(),
            entity_type: EntityType::Person,
            roles: Vec::new(),
            aliases: Vec::new(),
            methods: vec![ExtractionMethod::Nlp],
            confidence: 0.75,
            mentions: 1,
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_pair_within_window() {
        let text = "Maria Lopez met Viktor Orlov at the summit.";
        let records = scan_pair(
            text,
            &lowercase_preserving_offsets(&text),
            "news",
            &entity("ent_1", "Maria Lopez"),
            &entity("ent_2", "Viktor Orlov"),
            200,
        );
        assert_eq!(records.len(), 1);
        assert!(records[0].context.contains("Viktor Orlov"));
    }

    #[test]
    fn test_pair_outside_window_ignored() {
        let text = format!("Maria Lopez.{}Viktor Orlov.", " filler".repeat(40));
        let records = scan_pair(
            &text,
            &lowercase_preserving_offsets(&text),
            "news",
            &entity("ent_1", "Maria Lopez"),
            &entity("ent_2", "Viktor Orlov"),
            200,
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_alias_occurrences_count() {
        let mut a = entity("ent_1", "Viktor Orlov");
        a.aliases.push("V. Orlov".to_string());
        let text = "V. Orlov spoke to Maria Lopez yesterday.";
        let records = scan_pair(
            text,
            &lowercase_preserving_offsets(&text),
            "news",
            &a,
            &entity("ent_2", "Maria Lopez"),
            200,
        );
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_offsets_not_skewed_by_multibyte_case_folds() {
        // 'İ' grows by a byte under plain to_lowercase; the fold keeps it
        // in place so recorded offsets index the original text.
        let text = "İİİİ Maria Lopez met Viktor Orlov.";
        let lowered = lowercase_preserving_offsets(text);
        assert_eq!(lowered.len(), text.len());

        let records = scan_pair(
            text,
            &lowered,
            "news",
            &entity("ent_1", "Maria Lopez"),
            &entity("ent_2", "Viktor Orlov"),
            200,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].offset_a, text.find("Maria Lopez").unwrap());
        assert_eq!(records[0].offset_b, text.find("Viktor Orlov").unwrap());
        assert!(records[0].context.contains("Maria Lopez"));
        assert!(records[0].context.contains("Viktor Orlov"));
    }

    #[test]
    fn test_context_respects_char_boundaries() {
        let text = "Überprüfung: Müller GmbH zahlte Ødegård über ein Konto.";
        let lowered = lowercase_preserving_offsets(text);
        let records = scan_pair(
            text,
            &lowered,
            "news",
            &entity("ent_1", "Müller"),
            &entity("ent_2", "Ødegård"),
            200,
        );
        // Must not panic on multi-byte boundaries.
        assert!(!records.is_empty());
    }
}
