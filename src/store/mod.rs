pub mod sqlite;

use async_trait::async_trait;

use crate::core::{Attempt, AttemptGuess, DailyProgress, DailyTarget};
use crate::error::Result;

pub use sqlite::SqliteStore;

/// Trait for the engine's persistence boundary.
///
/// All engine-owned state (attempts, guess logs, daily targets, daily
/// progress) lives behind this trait; the engine itself keeps no in-process
/// mutable state between calls. The `get_or_create_*` operations must be
/// atomic insert-if-absent with a re-read on conflict, so concurrent
/// first-access races converge on one row.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Get or create the single attempt row for (user, set). A fresh row
    /// starts `in_progress` with zero wrong guesses.
    async fn get_or_create_attempt(&self, user_id: &str, set_id: i64) -> Result<Attempt>;

    /// Fetch an attempt by id
    async fn get_attempt(&self, attempt_id: i64) -> Result<Option<Attempt>>;

    /// Persist status, wrong-guess counter, and completion timestamp
    async fn update_attempt(&self, attempt: &Attempt) -> Result<()>;

    /// Append one successful-match row under an attempt
    async fn record_guess(
        &self,
        attempt_id: i64,
        entry_id: i64,
        guessed_text: &str,
        score: f64,
    ) -> Result<AttemptGuess>;

    /// Distinct entry ids already solved within an attempt
    async fn solved_entries(&self, attempt_id: i64) -> Result<Vec<i64>>;

    /// Delete an attempt's guess log (restart support); returns rows removed
    async fn clear_guesses(&self, attempt_id: i64) -> Result<u64>;

    /// Insert-if-absent for the day's target; an existing row always wins
    async fn get_or_create_target(&self, target: &DailyTarget) -> Result<DailyTarget>;

    /// Fetch the target for (date, scope) if one was materialized
    async fn get_target(&self, date_key: &str, scope_key: &str) -> Result<Option<DailyTarget>>;

    /// Get or create the progress row for (user, date)
    async fn get_or_create_progress(
        &self,
        user_id: &str,
        date_key: &str,
        scope_key: &str,
        entry_id: i64,
    ) -> Result<DailyProgress>;

    /// Fetch progress for (user, date) if any
    async fn get_progress(&self, user_id: &str, date_key: &str) -> Result<Option<DailyProgress>>;

    /// Persist counters, flags, and the guess log of a progress row
    async fn update_progress(&self, progress: &DailyProgress) -> Result<()>;

    /// Aggregate engine statistics
    async fn stats(&self) -> Result<EngineStats>;
}

/// Aggregate counters over engine-owned state
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    pub attempts_in_progress: u64,
    pub attempts_completed: u64,
    pub attempts_abandoned: u64,
    pub daily_players: u64,
    pub daily_wins: u64,
    pub daily_losses: u64,
}

impl EngineStats {
    /// Share of terminal daily rounds that ended in a win
    pub fn daily_win_rate(&self) -> f64 {
        let finished = self.daily_wins + self.daily_losses;
        if finished == 0 {
            0.0
        } else {
            self.daily_wins as f64 / finished as f64
        }
    }
}
