use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

use crate::core::{Attempt, AttemptGuess, AttemptStatus, DailyGuessLog, DailyProgress, DailyTarget};
use crate::error::{GameEngineError, Result};
use crate::store::{EngineStats, GameStore};

/// SQLite-backed game store.
///
/// One row per (user, set) attempt and per (user, date) daily progress; the
/// first-access races of both are resolved with `INSERT OR IGNORE` followed
/// by a re-read, so concurrent creators converge on the same row. The
/// connection mutex doubles as the per-guess mutual-exclusion boundary.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).map_err(GameEngineError::Database)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                set_id INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'in_progress',
                wrong_guesses INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                completed_at TEXT,
                UNIQUE(user_id, set_id)
            );
            CREATE TABLE IF NOT EXISTS attempt_guesses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                attempt_id INTEGER NOT NULL,
                entry_id INTEGER NOT NULL,
                guessed_text TEXT NOT NULL,
                score REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_attempt_guesses_attempt
                ON attempt_guesses(attempt_id);
            CREATE TABLE IF NOT EXISTS daily_targets (
                date_key TEXT NOT NULL,
                scope_key TEXT NOT NULL,
                entry_id INTEGER NOT NULL,
                seed INTEGER NOT NULL,
                PRIMARY KEY (date_key, scope_key)
            );
            CREATE TABLE IF NOT EXISTS daily_progress (
                user_id TEXT NOT NULL,
                date_key TEXT NOT NULL,
                scope_key TEXT NOT NULL,
                entry_id INTEGER NOT NULL,
                attempts INTEGER NOT NULL DEFAULT 0,
                wrong_attempts INTEGER NOT NULL DEFAULT 0,
                guessed INTEGER NOT NULL DEFAULT 0,
                lost INTEGER NOT NULL DEFAULT 0,
                log TEXT NOT NULL DEFAULT '[]',
                PRIMARY KEY (user_id, date_key)
            );",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn parse_timestamp(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn attempt_from_row(row: &Row<'_>) -> rusqlite::Result<Attempt> {
        let status_raw: String = row.get(3)?;
        let status = AttemptStatus::parse(&status_raw).ok_or_else(|| {
            rusqlite::Error::ToSqlConversionFailure(
                format!("invalid attempt status: {}", status_raw).into(),
            )
        })?;
        let created_at: String = row.get(5)?;
        let updated_at: String = row.get(6)?;
        let completed_at: Option<String> = row.get(7)?;

        Ok(Attempt {
            id: row.get(0)?,
            user_id: row.get(1)?,
            set_id: row.get(2)?,
            status,
            wrong_guesses: row.get(4)?,
            created_at: Self::parse_timestamp(&created_at),
            updated_at: Self::parse_timestamp(&updated_at),
            completed_at: completed_at.as_deref().map(Self::parse_timestamp),
        })
    }

    fn progress_from_row(row: &Row<'_>) -> rusqlite::Result<DailyProgress> {
        let log_json: String = row.get(8)?;
        let log: Vec<DailyGuessLog> = serde_json::from_str(&log_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(DailyProgress {
            user_id: row.get(0)?,
            date_key: row.get(1)?,
            scope_key: row.get(2)?,
            entry_id: row.get(3)?,
            attempts: row.get(4)?,
            wrong_attempts: row.get(5)?,
            guessed: row.get::<_, i64>(6)? != 0,
            lost: row.get::<_, i64>(7)? != 0,
            log,
        })
    }
}

const ATTEMPT_COLUMNS: &str =
    "id, user_id, set_id, status, wrong_guesses, created_at, updated_at, completed_at";

const PROGRESS_COLUMNS: &str =
    "user_id, date_key, scope_key, entry_id, attempts, wrong_attempts, guessed, lost, log";

#[async_trait]
impl GameStore for SqliteStore {
    async fn get_or_create_attempt(&self, user_id: &str, set_id: i64) -> Result<Attempt> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT OR IGNORE INTO attempts (user_id, set_id, status, wrong_guesses, created_at, updated_at)
             VALUES (?1, ?2, 'in_progress', 0, ?3, ?3)",
            params![user_id, set_id, now],
        )?;

        let attempt = conn.query_row(
            &format!("SELECT {ATTEMPT_COLUMNS} FROM attempts WHERE user_id = ?1 AND set_id = ?2"),
            params![user_id, set_id],
            Self::attempt_from_row,
        )?;

        Ok(attempt)
    }

    async fn get_attempt(&self, attempt_id: i64) -> Result<Option<Attempt>> {
        let conn = self.conn.lock().unwrap();
        let attempt = conn
            .query_row(
                &format!("SELECT {ATTEMPT_COLUMNS} FROM attempts WHERE id = ?1"),
                params![attempt_id],
                Self::attempt_from_row,
            )
            .optional()?;
        Ok(attempt)
    }

    async fn update_attempt(&self, attempt: &Attempt) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE attempts
             SET status = ?2, wrong_guesses = ?3, completed_at = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                attempt.id,
                attempt.status.as_str(),
                attempt.wrong_guesses,
                attempt.completed_at.map(|t| t.to_rfc3339()),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    async fn record_guess(
        &self,
        attempt_id: i64,
        entry_id: i64,
        guessed_text: &str,
        score: f64,
    ) -> Result<AttemptGuess> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO attempt_guesses (attempt_id, entry_id, guessed_text, score)
             VALUES (?1, ?2, ?3, ?4)",
            params![attempt_id, entry_id, guessed_text, score],
        )?;

        Ok(AttemptGuess {
            id: conn.last_insert_rowid(),
            attempt_id,
            entry_id,
            guessed_text: guessed_text.to_string(),
            score,
        })
    }

    async fn solved_entries(&self, attempt_id: i64) -> Result<Vec<i64>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT entry_id FROM attempt_guesses WHERE attempt_id = ?1 ORDER BY entry_id",
        )?;
        let ids = stmt
            .query_map(params![attempt_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    async fn clear_guesses(&self, attempt_id: i64) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM attempt_guesses WHERE attempt_id = ?1",
            params![attempt_id],
        )?;
        Ok(deleted as u64)
    }

    async fn get_or_create_target(&self, target: &DailyTarget) -> Result<DailyTarget> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR IGNORE INTO daily_targets (date_key, scope_key, entry_id, seed)
             VALUES (?1, ?2, ?3, ?4)",
            params![target.date_key, target.scope_key, target.entry_id, target.seed],
        )?;

        // The stored row wins: on a lost race the earlier insert is returned
        let stored = conn.query_row(
            "SELECT date_key, scope_key, entry_id, seed
             FROM daily_targets WHERE date_key = ?1 AND scope_key = ?2",
            params![target.date_key, target.scope_key],
            |row| {
                Ok(DailyTarget {
                    date_key: row.get(0)?,
                    scope_key: row.get(1)?,
                    entry_id: row.get(2)?,
                    seed: row.get(3)?,
                })
            },
        )?;

        Ok(stored)
    }

    async fn get_target(&self, date_key: &str, scope_key: &str) -> Result<Option<DailyTarget>> {
        let conn = self.conn.lock().unwrap();
        let target = conn
            .query_row(
                "SELECT date_key, scope_key, entry_id, seed
                 FROM daily_targets WHERE date_key = ?1 AND scope_key = ?2",
                params![date_key, scope_key],
                |row| {
                    Ok(DailyTarget {
                        date_key: row.get(0)?,
                        scope_key: row.get(1)?,
                        entry_id: row.get(2)?,
                        seed: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(target)
    }

    async fn get_or_create_progress(
        &self,
        user_id: &str,
        date_key: &str,
        scope_key: &str,
        entry_id: i64,
    ) -> Result<DailyProgress> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR IGNORE INTO daily_progress
                (user_id, date_key, scope_key, entry_id, attempts, wrong_attempts, guessed, lost, log)
             VALUES (?1, ?2, ?3, ?4, 0, 0, 0, 0, '[]')",
            params![user_id, date_key, scope_key, entry_id],
        )?;

        let progress = conn.query_row(
            &format!(
                "SELECT {PROGRESS_COLUMNS} FROM daily_progress
                 WHERE user_id = ?1 AND date_key = ?2"
            ),
            params![user_id, date_key],
            Self::progress_from_row,
        )?;

        Ok(progress)
    }

    async fn get_progress(&self, user_id: &str, date_key: &str) -> Result<Option<DailyProgress>> {
        let conn = self.conn.lock().unwrap();
        let progress = conn
            .query_row(
                &format!(
                    "SELECT {PROGRESS_COLUMNS} FROM daily_progress
                     WHERE user_id = ?1 AND date_key = ?2"
                ),
                params![user_id, date_key],
                Self::progress_from_row,
            )
            .optional()?;
        Ok(progress)
    }

    async fn update_progress(&self, progress: &DailyProgress) -> Result<()> {
        let log_json = serde_json::to_string(&progress.log)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE daily_progress
             SET attempts = ?3, wrong_attempts = ?4, guessed = ?5, lost = ?6, log = ?7
             WHERE user_id = ?1 AND date_key = ?2",
            params![
                progress.user_id,
                progress.date_key,
                progress.attempts,
                progress.wrong_attempts,
                progress.guessed as i64,
                progress.lost as i64,
                log_json,
            ],
        )?;
        Ok(())
    }

    async fn stats(&self) -> Result<EngineStats> {
        let conn = self.conn.lock().unwrap();

        let count_status = |status: &str| -> Result<u64> {
            let count: u64 = conn.query_row(
                "SELECT COUNT(*) FROM attempts WHERE status = ?1",
                params![status],
                |row| row.get(0),
            )?;
            Ok(count)
        };

        let attempts_in_progress = count_status("in_progress")?;
        let attempts_completed = count_status("completed")?;
        let attempts_abandoned = count_status("abandoned")?;

        let (daily_players, daily_wins, daily_losses): (u64, u64, u64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(guessed), 0), COALESCE(SUM(lost), 0)
             FROM daily_progress",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(EngineStats {
            attempts_in_progress,
            attempts_completed,
            attempts_abandoned,
            daily_players,
            daily_wins,
            daily_losses,
        })
    }
}
