use std::io;

use servtrack_core::context::{ContextError, ServiceError};
use servtrack_core::view::SkipReason;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Time tracking ID cannot be empty")]
    EmptyId,
    #[error("Note text cannot be empty")]
    EmptyNote,
    #[error("Could not load time tracking record {0}")]
    NotLoaded(String),
    #[error("Nothing to stop: {0}")]
    StopSkipped(SkipReason),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Field-level messages reported by the API, if any.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Context(error) => error.source.details(),
            Self::Service(error) => error.details(),
            _ => Vec::new(),
        }
    }
}
