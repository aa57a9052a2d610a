//! Error types for the extraction pipeline.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, CompassError>;

/// Errors that can occur while extracting and publishing statements.
#[derive(Debug, Error)]
pub enum CompassError {
    /// Numeric text contained no digit run
    #[error("no amount in text: {0:?}")]
    Parse(String),

    /// None of the tag variants for a statement matched
    #[error("{statement} not found in filing")]
    StatementNotFound {
        /// Label of the statement that was looked up
        statement: String,
    },

    /// Persistence port failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A filing record lacks something extraction needs
    #[error("Invalid filing {doc_id}: {reason}")]
    InvalidFiling {
        /// Document the record describes
        doc_id: String,
        /// What was wrong
        reason: String,
    },

    /// A filing task exceeded its deadline
    #[error("Filing {doc_id} timed out after {secs}s")]
    Timeout {
        /// Document being processed
        doc_id: String,
        /// Deadline in seconds
        secs: u64,
    },

    /// A spawned filing task panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}
