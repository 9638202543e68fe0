use strsim::levenshtein;

/// String similarity in [0, 1]: `1 - edit_distance / max(len)`.
///
/// Operates on already-normalized strings; lengths are counted in chars so
/// multi-byte names are not penalized.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        // Two empty strings are identical.
        return 1.0;
    }

    let distance = levenshtein(a, b);
    1.0 - (distance as f64 / max_len as f64)
}
