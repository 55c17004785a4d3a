use serde::{Deserialize, Serialize};

/// Wrong-guess budget for the daily game
pub const MAX_WRONG_ATTEMPTS: u32 = 10;

/// The entry deterministically chosen for one (date, scope) pair.
///
/// Unique per key, created lazily on first access and immutable afterwards.
/// Persistence is a caching/idempotence concern only; the seed recomputes to
/// the same value on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyTarget {
    /// UTC calendar day, `YYYY-MM-DD`
    pub date_key: String,
    /// Scope the pool was drawn from, e.g. a team id
    pub scope_key: String,
    pub entry_id: i64,
    /// First 32 bits (big-endian) of the selection hash
    pub seed: u32,
}

/// Derived view of a daily progress row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyStatus {
    Playing,
    Won,
    Lost,
}

/// One line of a user's daily guess history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyGuessLog {
    pub text: String,
    pub correct: bool,
}

/// A user's bounded-attempt state against one [`DailyTarget`].
///
/// Unique per (user, date). Terminal once `guessed` or `lost`; further
/// guesses re-report the outcome without mutating anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyProgress {
    pub user_id: String,
    pub date_key: String,
    pub scope_key: String,
    pub entry_id: i64,
    pub attempts: u32,
    pub wrong_attempts: u32,
    pub guessed: bool,
    pub lost: bool,
    pub log: Vec<DailyGuessLog>,
}

impl DailyProgress {
    pub fn status(&self) -> DailyStatus {
        if self.guessed {
            DailyStatus::Won
        } else if self.lost {
            DailyStatus::Lost
        } else {
            DailyStatus::Playing
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.guessed || self.lost
    }

    /// Photo blur for the presentation layer: starts at 100% and drops 10
    /// points per wrong attempt; 0 on a win regardless of attempts.
    pub fn blur_percent(&self) -> u32 {
        if self.guessed {
            0
        } else {
            100u32.saturating_sub(self.wrong_attempts * 10)
        }
    }
}
