use rapidfuzz::distance::levenshtein;

/// Normalized edit-distance similarity between two normalized strings.
///
/// `1 - lev(a, b) / max(|a|, |b|)`, so 1.0 iff the strings are equal and 0.0
/// when exactly one of them is empty. Unit insert/delete/substitute costs.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein::distance(a.chars(), b.chars());
    1.0 - distance as f64 / max_len as f64
}

/// Minimum similarity a fuzzy match must clear, as a function of string
/// length. Shorter strings get a stricter bound because a fixed edit distance
/// is proportionally more damaging to them.
///
/// Callers pass the minimum of the two compared lengths, so a short guess
/// against a long name is held to the stricter bound.
pub fn acceptance_threshold(len: usize) -> f64 {
    if len <= 6 {
        0.85
    } else if len <= 12 {
        0.80
    } else {
        0.75
    }
}

/// Similarity of `a` against `b`, returned only when it clears the
/// length-derived threshold. The threshold length is the shorter of the two
/// strings, so a short guess against a long name is held to the strict bound.
pub fn qualifying_similarity(a: &str, b: &str) -> Option<f64> {
    let score = similarity(a, b);
    let len = a.chars().count().min(b.chars().count());
    if score >= acceptance_threshold(len) {
        Some(score)
    } else {
        None
    }
}
