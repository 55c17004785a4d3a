use serde::{Deserialize, Serialize};

/// Why a guess failed to produce a new match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchReason {
    /// The guess identifies an entry that was already solved
    AlreadyGuessed,
    /// The guess identifies nothing in the candidate pool
    NoMatch,
}

/// Outcome of running one guess through the matching engine.
///
/// Failure to match is an expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MatchResult {
    Matched { entry_id: i64, score: f64 },
    NoMatch { reason: NoMatchReason },
}

impl MatchResult {
    pub fn no_match() -> Self {
        MatchResult::NoMatch {
            reason: NoMatchReason::NoMatch,
        }
    }

    pub fn already_guessed() -> Self {
        MatchResult::NoMatch {
            reason: NoMatchReason::AlreadyGuessed,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }
}

/// Cosmetic hint attached to a daily guess, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessFeedback {
    /// The guess won the round
    Correct,
    /// Not a win, but similarity against the target's primary name >= 0.5
    Close,
    /// Not even close
    Wrong,
}
