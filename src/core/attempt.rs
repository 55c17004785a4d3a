use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a roster attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl AttemptStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttemptStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::InProgress => "in_progress",
            AttemptStatus::Completed => "completed",
            AttemptStatus::Abandoned => "abandoned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(AttemptStatus::InProgress),
            "completed" => Some(AttemptStatus::Completed),
            "abandoned" => Some(AttemptStatus::Abandoned),
            _ => None,
        }
    }
}

/// A user's session against one [`crate::core::ReferenceSet`].
///
/// At most one `in_progress` attempt exists per (user, set); restarting a
/// terminal attempt resets the same row instead of creating a new one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attempt {
    pub id: i64,
    pub user_id: String,
    pub set_id: i64,
    pub status: AttemptStatus,
    pub wrong_guesses: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set only when status is `completed`
    pub completed_at: Option<DateTime<Utc>>,
}

impl Attempt {
    pub fn is_in_progress(&self) -> bool {
        self.status == AttemptStatus::InProgress
    }
}

/// Append-only log entry under an [`Attempt`], one row per successful match.
///
/// The attempt's solved set is exactly the distinct `entry_id`s of its rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttemptGuess {
    pub id: i64,
    pub attempt_id: i64,
    pub entry_id: i64,
    /// Raw guess text as typed by the user
    pub guessed_text: String,
    /// Match confidence in [0,1]
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            AttemptStatus::InProgress,
            AttemptStatus::Completed,
            AttemptStatus::Abandoned,
        ] {
            assert_eq!(AttemptStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AttemptStatus::parse("bogus"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!AttemptStatus::InProgress.is_terminal());
        assert!(AttemptStatus::Completed.is_terminal());
        assert!(AttemptStatus::Abandoned.is_terminal());
    }
}
