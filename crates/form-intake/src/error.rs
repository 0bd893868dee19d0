//! Error types for the intake service

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for intake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Intake service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required form field is missing or empty
    #[error("{0}")]
    Validation(String),

    /// The multipart body could not be read
    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    /// The intake body exceeded the configured upload limit
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// Filename is empty or escapes the upload directory
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    /// Submission or file not found
    #[error("{0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Zip assembly error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// HTTP request error (admin client)
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::Multipart(_) | Error::InvalidFilename(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_)
            | Error::Io(_)
            | Error::Database(_)
            | Error::Archive(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::Validation(_) => "validation_error",
            Error::Multipart(_) => "multipart_error",
            Error::PayloadTooLarge(_) => "payload_too_large",
            Error::InvalidFilename(_) => "invalid_filename",
            Error::NotFound(_) => "not_found",
            Error::Io(_) => "io_error",
            Error::Database(_) => "database_error",
            Error::Archive(_) => "archive_error",
            Error::Http(_) => "http_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

impl From<MultipartError> for Error {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge(err.body_text())
        } else {
            Error::Multipart(err.body_text())
        }
    }
}

impl From<MultipartRejection> for Error {
    fn from(rejection: MultipartRejection) -> Self {
        Error::Multipart(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("Task join error: {}", err))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
            "type": self.error_type(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::InvalidFilename("../etc".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::PayloadTooLarge("x".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            Error::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_is_bare() {
        let err = Error::validation("All fields are required");
        assert_eq!(err.to_string(), "All fields are required");
    }
}
