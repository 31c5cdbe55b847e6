//! Hand history error types.

use thiserror::Error;

/// Hand history errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The submitted hand doesn't describe a six-seat hand
    #[error("Invalid hand: {0}")]
    InvalidHand(String),

    /// The remote store couldn't be reached or answered with an error
    #[error("Transport error: {0}")]
    Transport(String),

    /// A stored row no longer parses
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl HistoryError {
    /// Message safe to hand back to an API caller.
    pub fn client_message(&self) -> String {
        match self {
            HistoryError::Database(_) => "Internal server error".to_string(),
            HistoryError::Corrupt(_) => "Stored hand could not be read".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for hand history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
