use std::collections::HashSet;

use crate::core::{MatchResult, ReferenceEntry};
use crate::matching::normalize;
use crate::matching::similarity::qualifying_similarity;

/// Decide whether a free-text guess identifies exactly one candidate.
///
/// All comparisons run on normalized forms. Tiers, in strict precedence:
/// already-guessed short-circuit, exact name, alias, substring, fuzzy-best.
/// Candidates in `solved` are excluded from new-match search but still
/// checked first, so re-guessing a solved entry reports `already_guessed`
/// instead of being treated as a fresh near-miss.
///
/// Pure and stateless: persisting a match and counting wrong guesses are the
/// caller's concern. Equal-score ties in the fuzzy tier resolve to the
/// candidate encountered first in the given iteration order.
pub fn match_guess(
    guess_text: &str,
    candidates: &[ReferenceEntry],
    solved: &HashSet<i64>,
) -> MatchResult {
    let guess = normalize(guess_text);
    if guess.is_empty() {
        return MatchResult::no_match();
    }

    // Re-guess of an already-solved entry, by name, near-miss, or alias
    for candidate in candidates.iter().filter(|c| solved.contains(&c.id)) {
        if guess == candidate.normalized_name
            || qualifying_similarity(&guess, &candidate.normalized_name).is_some()
            || candidate.normalized_aliases().iter().any(|a| *a == guess)
        {
            return MatchResult::already_guessed();
        }
    }

    let open: Vec<&ReferenceEntry> = candidates
        .iter()
        .filter(|c| !solved.contains(&c.id))
        .collect();

    // Exact tier
    for candidate in &open {
        if guess == candidate.normalized_name {
            return MatchResult::Matched {
                entry_id: candidate.id,
                score: 1.0,
            };
        }
    }

    // Alias tier
    for candidate in &open {
        if candidate.normalized_aliases().iter().any(|a| *a == guess) {
            return MatchResult::Matched {
                entry_id: candidate.id,
                score: 1.0,
            };
        }
    }

    // Substring tier: surname-only guesses, or accent collapses that leave
    // one string contained in the other
    for candidate in &open {
        let name = &candidate.normalized_name;
        if name.contains(&guess) || guess.contains(name.as_str()) {
            if let Some(score) = qualifying_similarity(&guess, name) {
                return MatchResult::Matched {
                    entry_id: candidate.id,
                    score,
                };
            }
        }
    }

    // Fuzzy tier: best qualifying similarity, first-seen wins ties
    let mut best: Option<(i64, f64)> = None;
    for candidate in &open {
        if let Some(score) = qualifying_similarity(&guess, &candidate.normalized_name) {
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate.id, score));
            }
        }
    }

    match best {
        Some((entry_id, score)) => MatchResult::Matched { entry_id, score },
        None => MatchResult::no_match(),
    }
}
