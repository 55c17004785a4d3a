use std::sync::Arc;

use chrono::NaiveDate;
use elenco_game_engine::{
    AttemptStatus, DailyStatus, GameEngine, GameEngineError, GuessFeedback, MatchResult,
    MemoryProvider, NoMatchReason, ReferenceEntry, ReferenceSet, MAX_WRONG_ATTEMPTS,
};

const SET_ID: i64 = 1;
const SCOPE: &str = "corinthians";

fn demo_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
}

fn seeded_provider() -> Arc<MemoryProvider> {
    let provider = MemoryProvider::new();
    let entries = vec![
        ReferenceEntry::new(1, SET_ID, "Fábio Costa"),
        ReferenceEntry::new(2, SET_ID, "Tévez").with_aliases(vec!["Apache".to_string()]),
        ReferenceEntry::new(3, SET_ID, "Gil"),
    ];
    let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
    provider.seed_set(ReferenceSet::new(SET_ID, "Corinthians 2005"), entries);
    provider.seed_scope(SCOPE, ids);
    Arc::new(provider)
}

async fn new_engine() -> GameEngine {
    GameEngine::new(":memory:", seeded_provider()).await.unwrap()
}

#[tokio::test]
async fn test_roster_session_to_completion() {
    let engine = new_engine().await;

    let session = engine.start_attempt("u1", SET_ID).await.unwrap();
    assert_eq!(session.attempt.status, AttemptStatus::InProgress);
    assert_eq!(session.total_entries, 3);
    assert!(session.solved_entry_ids.is_empty());
    let attempt_id = session.attempt.id;

    // accent-insensitive exact match
    let outcome = engine.guess_roster(attempt_id, "u1", "tevez").await.unwrap();
    assert_eq!(
        outcome.result,
        MatchResult::Matched {
            entry_id: 2,
            score: 1.0
        }
    );
    assert_eq!(outcome.status, AttemptStatus::InProgress);
    assert_eq!(outcome.solved_count, 1);

    // re-guessing a solved entry is flagged, not treated as a fresh miss
    let outcome = engine.guess_roster(attempt_id, "u1", "Tevez").await.unwrap();
    assert_eq!(
        outcome.result,
        MatchResult::NoMatch {
            reason: NoMatchReason::AlreadyGuessed
        }
    );
    assert_eq!(outcome.wrong_guesses, 0);

    // a miss only bumps the wrong counter
    let outcome = engine.guess_roster(attempt_id, "u1", "romario").await.unwrap();
    assert_eq!(
        outcome.result,
        MatchResult::NoMatch {
            reason: NoMatchReason::NoMatch
        }
    );
    assert_eq!(outcome.wrong_guesses, 1);
    assert_eq!(outcome.solved_count, 1);

    engine.guess_roster(attempt_id, "u1", "gil").await.unwrap();
    let outcome = engine
        .guess_roster(attempt_id, "u1", "fabio costa")
        .await
        .unwrap();
    assert_eq!(outcome.status, AttemptStatus::Completed);
    assert_eq!(outcome.solved_count, 3);

    let state = engine.attempt_state(attempt_id, "u1").await.unwrap();
    assert!(state.attempt.completed_at.is_some());

    // guessing after completion is a state error
    let err = engine
        .guess_roster(attempt_id, "u1", "anything")
        .await
        .unwrap_err();
    assert!(matches!(err, GameEngineError::NotInProgress(_)));
}

#[tokio::test]
async fn test_start_is_idempotent_and_restart_resets_in_place() {
    let engine = new_engine().await;

    let first = engine.start_attempt("u1", SET_ID).await.unwrap();
    engine
        .guess_roster(first.attempt.id, "u1", "gil")
        .await
        .unwrap();

    // starting again resumes the same in-progress attempt with its progress
    let resumed = engine.start_attempt("u1", SET_ID).await.unwrap();
    assert_eq!(resumed.attempt.id, first.attempt.id);
    assert_eq!(resumed.solved_entry_ids, vec![3]);

    // complete it, then start again: same row, progress cleared
    engine
        .guess_roster(first.attempt.id, "u1", "tevez")
        .await
        .unwrap();
    engine
        .guess_roster(first.attempt.id, "u1", "fabio costa")
        .await
        .unwrap();

    let restarted = engine.start_attempt("u1", SET_ID).await.unwrap();
    assert_eq!(restarted.attempt.id, first.attempt.id);
    assert_eq!(restarted.attempt.status, AttemptStatus::InProgress);
    assert_eq!(restarted.attempt.wrong_guesses, 0);
    assert!(restarted.attempt.completed_at.is_none());
    assert!(restarted.solved_entry_ids.is_empty());
}

#[tokio::test]
async fn test_abandon_and_reset() {
    let engine = new_engine().await;

    let session = engine.start_attempt("u1", SET_ID).await.unwrap();
    let attempt_id = session.attempt.id;

    assert!(engine.abandon_attempt(attempt_id, "u1").await.unwrap());
    let err = engine.guess_roster(attempt_id, "u1", "gil").await.unwrap_err();
    assert!(matches!(err, GameEngineError::NotInProgress(_)));

    assert!(engine.reset_attempt(attempt_id, "u1").await.unwrap());
    let outcome = engine.guess_roster(attempt_id, "u1", "gil").await.unwrap();
    assert!(outcome.result.is_matched());

    // wrong owner sees nothing
    assert!(!engine.reset_attempt(attempt_id, "someone-else").await.unwrap());
    assert!(!engine.abandon_attempt(attempt_id, "someone-else").await.unwrap());
    let err = engine
        .guess_roster(attempt_id, "someone-else", "gil")
        .await
        .unwrap_err();
    assert!(matches!(err, GameEngineError::NotFound(_)));
}

#[tokio::test]
async fn test_unknown_set_fails_start() {
    let engine = new_engine().await;
    let err = engine.start_attempt("u1", 999).await.unwrap_err();
    assert!(matches!(err, GameEngineError::NotFound(_)));
}

#[tokio::test]
async fn test_daily_target_is_deterministic_and_cached() {
    let engine = new_engine().await;

    let first = engine.daily_target(demo_date(), SCOPE).await.unwrap();
    let second = engine.daily_target(demo_date(), SCOPE).await.unwrap();
    assert_eq!(first, second);

    // seed = first 32 bits of SHA-256("2026-02-10:corinthians")
    assert_eq!(first.seed, 3_110_682_399);
    // pool of 3 entries sorted by id, index = seed % 3 = 0
    assert_eq!(first.entry_id, 1);

    // a second engine over a fresh store derives the same target
    let other = GameEngine::new(":memory:", seeded_provider()).await.unwrap();
    let replayed = other.daily_target(demo_date(), SCOPE).await.unwrap();
    assert_eq!(replayed.entry_id, first.entry_id);
    assert_eq!(replayed.seed, first.seed);
}

#[tokio::test]
async fn test_daily_game_win_and_idempotent_terminal() {
    let engine = new_engine().await;

    // target for this date/scope is entry 1, "Fábio Costa"
    let outcome = engine
        .daily_guess("u1", SCOPE, demo_date(), "neymar")
        .await
        .unwrap();
    assert_eq!(outcome.status, DailyStatus::Playing);
    assert_eq!(outcome.wrong_attempts, 1);
    assert_eq!(outcome.blur_percent, 90);
    assert!(outcome.revealed_name.is_none());

    let outcome = engine
        .daily_guess("u1", SCOPE, demo_date(), "fabio costa")
        .await
        .unwrap();
    assert_eq!(outcome.status, DailyStatus::Won);
    assert_eq!(outcome.feedback, GuessFeedback::Correct);
    assert!(!outcome.close_match);
    assert_eq!(outcome.blur_percent, 0);
    assert_eq!(outcome.revealed_name.as_deref(), Some("Fábio Costa"));

    // terminal rounds absorb further guesses without mutating anything
    let replay = engine
        .daily_guess("u1", SCOPE, demo_date(), "whatever")
        .await
        .unwrap();
    assert_eq!(replay.status, DailyStatus::Won);
    assert_eq!(replay.attempts, outcome.attempts);
    assert_eq!(replay.wrong_attempts, outcome.wrong_attempts);
}

#[tokio::test]
async fn test_daily_fuzzy_win_flags_close_match() {
    let engine = new_engine().await;

    // one typo against "fabio costa": similarity 10/11 clears the threshold
    let outcome = engine
        .daily_guess("u1", SCOPE, demo_date(), "fabio colta")
        .await
        .unwrap();
    assert_eq!(outcome.status, DailyStatus::Won);
    assert_eq!(outcome.feedback, GuessFeedback::Correct);
    assert!(outcome.close_match);
}

#[tokio::test]
async fn test_daily_game_lost_after_budget_exhausted() {
    let engine = new_engine().await;

    for i in 1..MAX_WRONG_ATTEMPTS {
        let outcome = engine
            .daily_guess("u1", SCOPE, demo_date(), "zico")
            .await
            .unwrap();
        assert_eq!(outcome.status, DailyStatus::Playing);
        assert_eq!(outcome.wrong_attempts, i);
        assert_eq!(outcome.blur_percent, 100 - i * 10);
        assert!(outcome.revealed_name.is_none());
    }

    let outcome = engine
        .daily_guess("u1", SCOPE, demo_date(), "zico")
        .await
        .unwrap();
    assert_eq!(outcome.status, DailyStatus::Lost);
    assert_eq!(outcome.wrong_attempts, MAX_WRONG_ATTEMPTS);
    assert_eq!(outcome.blur_percent, 0);
    assert_eq!(outcome.revealed_name.as_deref(), Some("Fábio Costa"));

    // the budget never overshoots
    let replay = engine
        .daily_guess("u1", SCOPE, demo_date(), "zico")
        .await
        .unwrap();
    assert_eq!(replay.wrong_attempts, MAX_WRONG_ATTEMPTS);
    assert_eq!(replay.status, DailyStatus::Lost);
}

#[tokio::test]
async fn test_daily_close_feedback() {
    let engine = new_engine().await;

    // "fabio andre" vs "fabio costa": similarity 6/11, past the 0.5 hint bar
    let outcome = engine
        .daily_guess("u1", SCOPE, demo_date(), "fabio andre")
        .await
        .unwrap();
    assert_eq!(outcome.status, DailyStatus::Playing);
    assert_eq!(outcome.feedback, GuessFeedback::Close);

    let outcome = engine
        .daily_guess("u1", SCOPE, demo_date(), "zzzzz")
        .await
        .unwrap();
    assert_eq!(outcome.feedback, GuessFeedback::Wrong);
}

#[tokio::test]
async fn test_daily_empty_scope_fails() {
    let engine = new_engine().await;
    let err = engine
        .daily_guess("u1", "gremio", demo_date(), "anyone")
        .await
        .unwrap_err();
    assert!(matches!(err, GameEngineError::NoDailyTarget(_)));
}

#[tokio::test]
async fn test_daily_state_withholds_name_while_playing() {
    let engine = new_engine().await;

    assert!(engine.daily_state("u1", demo_date()).await.unwrap().is_none());

    engine
        .daily_guess("u1", SCOPE, demo_date(), "zico")
        .await
        .unwrap();
    let state = engine.daily_state("u1", demo_date()).await.unwrap().unwrap();
    assert_eq!(state.status, DailyStatus::Playing);
    assert!(state.revealed_name.is_none());
    assert_eq!(state.log.len(), 1);

    engine
        .daily_guess("u1", SCOPE, demo_date(), "fabio costa")
        .await
        .unwrap();
    let state = engine.daily_state("u1", demo_date()).await.unwrap().unwrap();
    assert_eq!(state.status, DailyStatus::Won);
    assert_eq!(state.revealed_name.as_deref(), Some("Fábio Costa"));
}

#[tokio::test]
async fn test_stats_roll_up() {
    let engine = new_engine().await;

    let session = engine.start_attempt("u1", SET_ID).await.unwrap();
    engine.abandon_attempt(session.attempt.id, "u1").await.unwrap();
    engine.start_attempt("u2", SET_ID).await.unwrap();

    engine
        .daily_guess("u1", SCOPE, demo_date(), "fabio costa")
        .await
        .unwrap();

    let stats = engine.stats().await.unwrap();
    assert_eq!(stats.attempts_abandoned, 1);
    assert_eq!(stats.attempts_in_progress, 1);
    assert_eq!(stats.daily_players, 1);
    assert_eq!(stats.daily_wins, 1);
}
