//! # Elenco Game Engine
//!
//! Player-guessing game engine for squad trivia:
//! - Tiered name matching (exact, alias, substring, fuzzy edit-distance)
//! - Accent-insensitive normalization of free-text guesses
//! - Deterministic "player of the day" selection from a date + scope hash
//! - Roster-session and bounded daily-guess state machines
//! - SQLite persistence with idempotent first-access materialization
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use elenco_game_engine::{GameEngine, MemoryProvider, ReferenceEntry, ReferenceSet};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(MemoryProvider::new());
//!     provider.seed_set(
//!         ReferenceSet::new(1, "Corinthians 2012"),
//!         vec![ReferenceEntry::new(1, 1, "Cássio"), ReferenceEntry::new(2, 1, "Paulinho")],
//!     );
//!
//!     let engine = GameEngine::new("elenco.db", provider).await?;
//!     let session = engine.start_attempt("user-1", 1).await?;
//!     let outcome = engine.guess_roster(session.attempt.id, "user-1", "cassio").await?;
//!     println!("{:?} -> {:?}", outcome.result, outcome.status);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod daily;
pub mod engine;
pub mod error;
pub mod matching;
pub mod provider;
pub mod store;

// Re-export primary types
pub use core::{
    Attempt, AttemptGuess, AttemptStatus, DailyGuessLog, DailyProgress, DailyStatus, DailyTarget,
    GuessFeedback, MatchResult, NoMatchReason, ReferenceEntry, ReferenceSet, MAX_WRONG_ATTEMPTS,
};
pub use daily::{daily_seed, date_key, select_daily};
pub use engine::{AttemptState, DailyGuessOutcome, DailyState, GameEngine, RosterGuessOutcome};
pub use error::{GameEngineError, Result};
pub use matching::{acceptance_threshold, match_guess, normalize, similarity};
pub use provider::{CandidateProvider, MemoryProvider};
pub use store::{EngineStats, GameStore, SqliteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
