//! Response envelopes shared by the API and its clients.
//!
//! Successful responses wrap their payload as `{ "data": ... }`; every
//! failing API response carries
//! `{ "error": { "message", "code", "errors": [{ "message" }] } }`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::ValidationErrors;

/// Closed set of error codes a client must be prepared to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Resource not found
    #[serde(rename = "ERR_NF")]
    NotFound,
    /// Remote or connection failure
    #[serde(rename = "ERR_REMOTE")]
    Remote,
    /// Operation not implemented
    #[serde(rename = "NOT_IMPL")]
    NotImplemented,
    /// Validation failure
    #[serde(rename = "ERR_VALID")]
    Validation,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "ERR_NF",
            Self::Remote => "ERR_REMOTE",
            Self::NotImplemented => "NOT_IMPL",
            Self::Validation => "ERR_VALID",
        }
    }

    /// The named error kind, where one exists. Validation failures have none.
    pub const fn name(self) -> Option<ErrorName> {
        match self {
            Self::NotFound => Some(ErrorName::NotFound),
            Self::Remote => Some(ErrorName::Connection),
            Self::NotImplemented => Some(ErrorName::MethodNotImplemented),
            Self::Validation => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&Error> for ErrorCode {
    fn from(value: &Error) -> Self {
        match value {
            Error::NotFound(_) => Self::NotFound,
            Error::InvalidInput(_) | Error::Validation(_) | Error::AlreadyConcluded(_) => {
                Self::Validation
            }
            Error::Database(_) | Error::LibSql(_) | Error::Io(_) => Self::Remote,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorName {
    #[serde(rename = "NOT_FOUND_ERROR")]
    NotFound,
    #[serde(rename = "CONNECTION_ERROR")]
    Connection,
    MethodNotImplemented,
}

/// Standard `{ "data": T }` success envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: ErrorCode,
    #[serde(default)]
    pub errors: Vec<SubError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

impl ErrorEnvelope {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                code,
                errors: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn with_errors<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error.errors.extend(messages.into_iter().map(|message| SubError {
            message: message.into(),
        }));
        self
    }

    pub const fn code(&self) -> ErrorCode {
        self.error.code
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }
}

impl From<&ValidationErrors> for ErrorEnvelope {
    fn from(value: &ValidationErrors) -> Self {
        Self::new(ErrorCode::Validation, "Validation failed")
            .with_errors(value.messages().iter().cloned())
    }
}
