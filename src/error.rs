use thiserror::Error;

/// Main error type for the game engine
#[derive(Error, Debug)]
pub enum GameEngineError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Attempt or progress row missing, or not owned by the acting user
    #[error("Not found: {0}")]
    NotFound(String),

    /// Guess issued against an attempt that already reached a terminal status
    #[error("Attempt {0} is not in progress")]
    NotInProgress(i64),

    /// Daily selection asked to pick from an empty candidate pool
    #[error("No candidates for scope: {0}")]
    NoCandidates(String),

    /// No daily target could be materialized for the scope
    #[error("No daily target for scope: {0}")]
    NoDailyTarget(String),

    /// Candidate provider errors
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for GameEngineError {
    fn from(s: String) -> Self {
        GameEngineError::Other(s)
    }
}

impl From<&str> for GameEngineError {
    fn from(s: &str) -> Self {
        GameEngineError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GameEngineError>;
