use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a player name (guessed or stored) into its comparable form.
///
/// Steps, in order: NFD decompose, strip combining marks, lowercase, drop
/// periods/commas/hyphens/apostrophes, collapse whitespace runs, trim.
/// Pure and total; garbage input yields an empty string, never an error.
/// Equality of two normalized strings is the exact-match test everywhere in
/// the engine, so `"Tévez"`, `"tevez"` and `"TEVEZ"` all compare equal.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| !matches!(c, '.' | ',' | '-' | '\'' | '\u{2019}'))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
