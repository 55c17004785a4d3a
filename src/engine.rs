use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{
    Attempt, AttemptStatus, DailyGuessLog, DailyProgress, DailyStatus, DailyTarget, GuessFeedback,
    MatchResult, NoMatchReason, ReferenceEntry, MAX_WRONG_ATTEMPTS,
};
use crate::daily::{date_key, select_daily};
use crate::error::{GameEngineError, Result};
use crate::matching::{match_guess, normalize, qualifying_similarity, similarity};
use crate::provider::CandidateProvider;
use crate::store::{EngineStats, GameStore, SqliteStore};

/// Main game engine orchestrator.
///
/// Stateless between calls: every operation re-reads from the store and the
/// provider, so concurrent requests for independent (user, target) pairs
/// never share in-process mutable state.
pub struct GameEngine {
    store: Arc<dyn GameStore>,
    provider: Arc<dyn CandidateProvider>,
}

/// Snapshot of a roster attempt, what the board UI renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptState {
    pub attempt: Attempt,
    pub solved_entry_ids: Vec<i64>,
    pub total_entries: usize,
}

/// Outcome of one roster guess
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterGuessOutcome {
    pub result: MatchResult,
    pub status: AttemptStatus,
    pub solved_count: usize,
    pub total_entries: usize,
    pub wrong_guesses: u32,
}

/// Outcome of one daily guess (also the re-reported view once terminal)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyGuessOutcome {
    pub status: DailyStatus,
    pub feedback: GuessFeedback,
    /// Win accepted through the fuzzy threshold rather than exact equality
    pub close_match: bool,
    pub attempts: u32,
    pub wrong_attempts: u32,
    pub blur_percent: u32,
    /// Target name, disclosed only once the round is over
    pub revealed_name: Option<String>,
}

/// Read-only view of a user's daily round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyState {
    pub date_key: String,
    pub status: DailyStatus,
    pub attempts: u32,
    pub wrong_attempts: u32,
    pub max_wrong_attempts: u32,
    pub blur_percent: u32,
    pub log: Vec<DailyGuessLog>,
    pub revealed_name: Option<String>,
}

impl GameEngine {
    /// Create an engine backed by a SQLite store at `db_path`
    pub async fn new(db_path: impl AsRef<str>, provider: Arc<dyn CandidateProvider>) -> Result<Self> {
        let store = Arc::new(SqliteStore::new(db_path.as_ref()).await?);
        Ok(Self::with_store(store, provider))
    }

    /// Create an engine over an already-constructed store
    pub fn with_store(store: Arc<dyn GameStore>, provider: Arc<dyn CandidateProvider>) -> Self {
        Self { store, provider }
    }

    async fn entries_for_set(&self, set_id: i64) -> Result<Vec<ReferenceEntry>> {
        let entries = self.provider.set_entries(set_id).await?;
        if entries.is_empty() {
            return Err(GameEngineError::NoCandidates(format!("set {}", set_id)));
        }
        Ok(entries)
    }

    /// Start (or resume) the user's session against a reference set.
    ///
    /// Idempotent: an existing in-progress attempt is returned as-is with its
    /// solved entries; a terminal attempt is reset in place rather than
    /// duplicated.
    pub async fn start_attempt(&self, user_id: &str, set_id: i64) -> Result<AttemptState> {
        if self.provider.get_set(set_id).await?.is_none() {
            return Err(GameEngineError::NotFound(format!("reference set {}", set_id)));
        }
        let total_entries = self.entries_for_set(set_id).await?.len();

        let mut attempt = self.store.get_or_create_attempt(user_id, set_id).await?;
        if attempt.status.is_terminal() {
            tracing::info!(
                attempt_id = attempt.id,
                user_id,
                "restarting terminal attempt in place"
            );
            self.restart_in_place(&mut attempt).await?;
        }

        let solved_entry_ids = self.store.solved_entries(attempt.id).await?;
        Ok(AttemptState {
            attempt,
            solved_entry_ids,
            total_entries,
        })
    }

    async fn restart_in_place(&self, attempt: &mut Attempt) -> Result<()> {
        self.store.clear_guesses(attempt.id).await?;
        attempt.status = AttemptStatus::InProgress;
        attempt.wrong_guesses = 0;
        attempt.completed_at = None;
        self.store.update_attempt(attempt).await
    }

    async fn owned_attempt(&self, attempt_id: i64, user_id: &str) -> Result<Option<Attempt>> {
        let attempt = self.store.get_attempt(attempt_id).await?;
        Ok(attempt.filter(|a| a.user_id == user_id))
    }

    /// Run one guess against a roster attempt.
    ///
    /// A new match appends to the guess log; a `no_match` increments the
    /// wrong-guess counter; an `already_guessed` mutates nothing. Solving the
    /// last remaining entry completes the attempt.
    pub async fn guess_roster(
        &self,
        attempt_id: i64,
        user_id: &str,
        text: &str,
    ) -> Result<RosterGuessOutcome> {
        let mut attempt = self
            .owned_attempt(attempt_id, user_id)
            .await?
            .ok_or_else(|| GameEngineError::NotFound(format!("attempt {}", attempt_id)))?;

        if !attempt.is_in_progress() {
            return Err(GameEngineError::NotInProgress(attempt_id));
        }

        let entries = self.entries_for_set(attempt.set_id).await?;
        let solved: HashSet<i64> = self
            .store
            .solved_entries(attempt.id)
            .await?
            .into_iter()
            .collect();

        let result = match_guess(text, &entries, &solved);
        let mut solved_count = solved.len();

        match result {
            MatchResult::Matched { entry_id, score } => {
                self.store
                    .record_guess(attempt.id, entry_id, text, score)
                    .await?;
                solved_count += 1;
                tracing::debug!(
                    attempt_id,
                    entry_id,
                    score,
                    solved = solved_count,
                    total = entries.len(),
                    "roster guess matched"
                );

                if solved_count == entries.len() {
                    attempt.status = AttemptStatus::Completed;
                    attempt.completed_at = Some(Utc::now());
                    self.store.update_attempt(&attempt).await?;
                    tracing::info!(attempt_id, user_id, "roster attempt completed");
                }
            }
            MatchResult::NoMatch {
                reason: NoMatchReason::NoMatch,
            } => {
                attempt.wrong_guesses += 1;
                self.store.update_attempt(&attempt).await?;
            }
            MatchResult::NoMatch {
                reason: NoMatchReason::AlreadyGuessed,
            } => {
                tracing::debug!(attempt_id, "guess repeated an already-solved entry");
            }
        }

        Ok(RosterGuessOutcome {
            result,
            status: attempt.status,
            solved_count,
            total_entries: entries.len(),
            wrong_guesses: attempt.wrong_guesses,
        })
    }

    /// Reset an attempt back to in-progress, clearing its guess log and
    /// wrong-guess counter. Returns false when the user owns no such attempt.
    pub async fn reset_attempt(&self, attempt_id: i64, user_id: &str) -> Result<bool> {
        match self.owned_attempt(attempt_id, user_id).await? {
            Some(mut attempt) => {
                self.restart_in_place(&mut attempt).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Abandon an in-progress attempt. Returns false when the user owns no
    /// such attempt; a terminal attempt is left unchanged.
    pub async fn abandon_attempt(&self, attempt_id: i64, user_id: &str) -> Result<bool> {
        match self.owned_attempt(attempt_id, user_id).await? {
            Some(mut attempt) => {
                if attempt.is_in_progress() {
                    attempt.status = AttemptStatus::Abandoned;
                    self.store.update_attempt(&attempt).await?;
                    tracing::info!(attempt_id, user_id, "roster attempt abandoned");
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Current snapshot of an attempt the user owns
    pub async fn attempt_state(&self, attempt_id: i64, user_id: &str) -> Result<AttemptState> {
        let attempt = self
            .owned_attempt(attempt_id, user_id)
            .await?
            .ok_or_else(|| GameEngineError::NotFound(format!("attempt {}", attempt_id)))?;
        let total_entries = self.entries_for_set(attempt.set_id).await?.len();
        let solved_entry_ids = self.store.solved_entries(attempt.id).await?;
        Ok(AttemptState {
            attempt,
            solved_entry_ids,
            total_entries,
        })
    }

    /// Materialize (or re-read) the daily target for one (date, scope).
    ///
    /// The selection is pure, so a lost insert race re-reads the same row;
    /// persistence is idempotence caching, not a correctness requirement.
    pub async fn daily_target(&self, date: NaiveDate, scope_key: &str) -> Result<DailyTarget> {
        let key = date_key(date);

        if let Some(existing) = self.store.get_target(&key, scope_key).await? {
            return Ok(existing);
        }

        let pool = self.provider.daily_pool(scope_key).await?;
        let (index, seed) = select_daily(&key, scope_key, pool.len())?;
        let chosen = &pool[index];
        tracing::info!(
            date_key = %key,
            scope_key,
            entry_id = chosen.id,
            seed,
            "daily target materialized"
        );

        self.store
            .get_or_create_target(&DailyTarget {
                date_key: key,
                scope_key: scope_key.to_string(),
                entry_id: chosen.id,
                seed,
            })
            .await
    }

    /// Today's target, using the UTC calendar date
    pub async fn daily_target_today(&self, scope_key: &str) -> Result<DailyTarget> {
        self.daily_target(Utc::now().date_naive(), scope_key).await
    }

    /// Run one guess in the daily game.
    ///
    /// Terminal rounds absorb further guesses idempotently, re-reporting the
    /// outcome without mutating anything, so client retries are safe.
    pub async fn daily_guess(
        &self,
        user_id: &str,
        scope_key: &str,
        date: NaiveDate,
        text: &str,
    ) -> Result<DailyGuessOutcome> {
        let target = self.daily_target(date, scope_key).await.map_err(|e| match e {
            GameEngineError::NoCandidates(_) => {
                GameEngineError::NoDailyTarget(scope_key.to_string())
            }
            other => other,
        })?;

        let entry = self
            .provider
            .get_entry(target.entry_id)
            .await?
            .ok_or_else(|| GameEngineError::NotFound(format!("entry {}", target.entry_id)))?;

        let mut progress = self
            .store
            .get_or_create_progress(user_id, &target.date_key, scope_key, target.entry_id)
            .await?;

        if progress.is_terminal() {
            return Ok(Self::terminal_outcome(&progress, &entry));
        }

        let guess = normalize(text);
        let variants = entry.accepted_variants();
        let exact = !guess.is_empty() && variants.iter().any(|v| *v == guess);
        let fuzzy = !exact
            && !guess.is_empty()
            && variants
                .iter()
                .any(|v| qualifying_similarity(&guess, v).is_some());

        progress.attempts += 1;

        let outcome = if exact || fuzzy {
            progress.guessed = true;
            progress.log.push(DailyGuessLog {
                text: text.to_string(),
                correct: true,
            });
            tracing::info!(user_id, scope_key, close_match = fuzzy, "daily round won");

            DailyGuessOutcome {
                status: DailyStatus::Won,
                feedback: GuessFeedback::Correct,
                close_match: fuzzy,
                attempts: progress.attempts,
                wrong_attempts: progress.wrong_attempts,
                blur_percent: progress.blur_percent(),
                revealed_name: Some(entry.display_name.clone()),
            }
        } else {
            progress.wrong_attempts += 1;
            progress.log.push(DailyGuessLog {
                text: text.to_string(),
                correct: false,
            });
            if progress.wrong_attempts >= MAX_WRONG_ATTEMPTS {
                progress.lost = true;
                tracing::info!(user_id, scope_key, "daily round lost");
            }

            let feedback = if similarity(&guess, &entry.normalized_name) >= 0.5 {
                GuessFeedback::Close
            } else {
                GuessFeedback::Wrong
            };

            DailyGuessOutcome {
                status: progress.status(),
                feedback,
                close_match: false,
                attempts: progress.attempts,
                wrong_attempts: progress.wrong_attempts,
                blur_percent: progress.blur_percent(),
                revealed_name: progress
                    .lost
                    .then(|| entry.display_name.clone()),
            }
        };

        self.store.update_progress(&progress).await?;
        Ok(outcome)
    }

    /// Today's daily guess, using the UTC calendar date
    pub async fn daily_guess_today(
        &self,
        user_id: &str,
        scope_key: &str,
        text: &str,
    ) -> Result<DailyGuessOutcome> {
        self.daily_guess(user_id, scope_key, Utc::now().date_naive(), text)
            .await
    }

    fn terminal_outcome(progress: &DailyProgress, entry: &ReferenceEntry) -> DailyGuessOutcome {
        let feedback = if progress.guessed {
            GuessFeedback::Correct
        } else {
            GuessFeedback::Wrong
        };
        DailyGuessOutcome {
            status: progress.status(),
            feedback,
            close_match: false,
            attempts: progress.attempts,
            wrong_attempts: progress.wrong_attempts,
            blur_percent: progress.blur_percent(),
            revealed_name: Some(entry.display_name.clone()),
        }
    }

    /// Read-only view of a user's daily round, if they started one.
    /// The target name stays withheld while the round is still playing.
    pub async fn daily_state(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyState>> {
        let key = date_key(date);
        let Some(progress) = self.store.get_progress(user_id, &key).await? else {
            return Ok(None);
        };

        let revealed_name = if progress.is_terminal() {
            self.provider
                .get_entry(progress.entry_id)
                .await?
                .map(|e| e.display_name)
        } else {
            None
        };

        Ok(Some(DailyState {
            date_key: key,
            status: progress.status(),
            attempts: progress.attempts,
            wrong_attempts: progress.wrong_attempts,
            max_wrong_attempts: MAX_WRONG_ATTEMPTS,
            blur_percent: progress.blur_percent(),
            log: progress.log,
            revealed_name,
        }))
    }

    /// Aggregate engine statistics
    pub async fn stats(&self) -> Result<EngineStats> {
        self.store.stats().await
    }
}
