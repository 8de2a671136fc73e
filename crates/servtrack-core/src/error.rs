//! Error types for servtrack-core

use thiserror::Error;

use crate::models::ValidationErrors;

/// Result type alias using servtrack-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in servtrack-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Time tracking record not found
    #[error("Time tracking record not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One or more fields failed validation
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Mutation rejected because the record is already concluded
    #[error("Time tracking record {0} is already concluded")]
    AlreadyConcluded(String),
}
