//! Error types for FDP

use thiserror::Error;

/// Result type alias for FDP operations
pub type Result<T> = std::result::Result<T, FdpError>;

/// Main error type for FDP
#[derive(Error, Debug)]
pub enum FdpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unique constraint conflict: {0}")]
    Conflict(String),

    #[error("Failed to resolve entity: {0}")]
    Resolve(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl FdpError {
    /// True when the error is a uniqueness conflict that a caller may
    /// resolve by re-reading the winning row.
    pub fn is_conflict(&self) -> bool {
        matches!(self, FdpError::Conflict(_))
    }
}
