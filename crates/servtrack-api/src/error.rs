use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use servtrack_core::envelope::{ErrorCode, ErrorEnvelope};
use servtrack_core::models::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Time tracking record not found: {0}")]
    NotFound(String),
    #[error("Validation failed")]
    Validation(ValidationErrors),
    #[error("Time tracking record {0} is already concluded")]
    Conflict(String),
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::Validation(errors) => ErrorEnvelope::from(errors),
            Self::BadRequest(_) | Self::Conflict(_) => {
                ErrorEnvelope::new(ErrorCode::Validation, self.to_string())
            }
            Self::NotFound(_) => ErrorEnvelope::new(ErrorCode::NotFound, self.to_string()),
            Self::NotImplemented(_) => {
                ErrorEnvelope::new(ErrorCode::NotImplemented, self.to_string())
            }
            // Storage details stay in the log
            Self::Internal(_) => ErrorEnvelope::new(ErrorCode::Remote, "Internal server error"),
        }
    }
}

impl From<servtrack_core::Error> for AppError {
    fn from(value: servtrack_core::Error) -> Self {
        use servtrack_core::Error;

        match value {
            Error::NotFound(id) => Self::NotFound(id),
            Error::InvalidInput(message) => Self::BadRequest(message),
            Error::Validation(errors) => Self::Validation(errors),
            Error::AlreadyConcluded(id) => Self::Conflict(id),
            other @ (Error::Database(_) | Error::LibSql(_) | Error::Io(_)) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && !matches!(self, Self::NotImplemented(_)) {
            tracing::error!("Request failed: {self}");
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {self}");
        }
        (status, Json(self.envelope())).into_response()
    }
}
