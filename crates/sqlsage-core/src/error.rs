//! Error types for sqlsage

use thiserror::Error;

/// Core error type for sqlsage operations
#[derive(Error, Debug)]
pub enum SqlsageError {
    /// The input SQL failed validation before analysis (empty, whitespace-only).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl SqlsageError {
    /// Returns true for errors caused by the caller's input rather than
    /// a collaborator failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }

    /// Returns true for errors caused by an unavailable external
    /// collaborator (database connection down or closed).
    pub fn is_dependency(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type alias for sqlsage operations
pub type Result<T> = std::result::Result<T, SqlsageError>;
