//! Error types and HTTP response conversion
//!
//! [`Error`] is the only error type that crosses the HTTP boundary. Its
//! [`IntoResponse`] implementation is the single place where status codes and
//! error bodies are decided; handlers never build error responses themselves.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::store::{StoreError, StoreErrorKind};

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// A single violated rule on a named field or query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field or parameter name
    pub field: String,
    /// Human-readable rule description
    pub message: String,
}

impl FieldViolation {
    /// Create a new violation
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main error type for the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Request body failed field validation
    #[error("Validation failed: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// Request body could not be read or parsed
    #[error("Malformed request body: {0}")]
    MalformedInput(String),

    /// Referenced item does not exist
    #[error("Item not found with id {id}")]
    NotFound { id: i64 },

    /// Query parameter broke a constraint
    #[error("Constraint violation: {}", join_violations(.0))]
    ConstraintViolation(Vec<FieldViolation>),

    /// Persistence failure
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("{0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// When the error was produced
    pub timestamp: DateTime<Utc>,

    /// HTTP status code
    pub status: u16,

    /// Failure category label
    pub error: String,

    /// Human-readable explanation
    pub message: String,

    /// One entry per violated field, for validation and constraint failures
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    /// Create a new error response stamped with the current time
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attach per-field details
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }

    /// Generic 500 body, used for failures whose detail must not reach the client
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            labels::INTERNAL,
            message,
        )
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// `error` labels used in response bodies
pub mod labels {
    pub const VALIDATION: &str = "Validation Failed";
    pub const MALFORMED: &str = "Malformed JSON";
    pub const NOT_FOUND: &str = "Resource Not Found";
    pub const CONSTRAINT: &str = "Constraint Violation";
    pub const METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
    pub const PAYLOAD_TOO_LARGE: &str = "Payload Too Large";
    pub const REQUEST_TIMEOUT: &str = "Request Timeout";
    pub const INTERNAL: &str = "Internal Server Error";
}

impl Error {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::MalformedInput(_) | Error::ConstraintViolation(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Store(_) | Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Build the response body, logging server-side failures
    pub fn to_response(&self) -> ErrorResponse {
        let status = self.status_code();
        match self {
            Error::Validation(violations) => {
                tracing::debug!("Validation failed: {}", join_violations(violations));
                ErrorResponse::new(status, labels::VALIDATION, "One or more fields are invalid")
                    .with_details(violations.iter().map(ToString::to_string).collect())
            }

            Error::MalformedInput(msg) => {
                tracing::debug!("Malformed request body: {}", msg);
                ErrorResponse::new(status, labels::MALFORMED, msg.clone())
            }

            Error::NotFound { .. } => {
                tracing::debug!("{}", self);
                ErrorResponse::new(status, labels::NOT_FOUND, self.to_string())
            }

            Error::ConstraintViolation(violations) => {
                tracing::debug!("Constraint violation: {}", join_violations(violations));
                ErrorResponse::new(status, labels::CONSTRAINT, "Validation error")
                    .with_details(violations.iter().map(ToString::to_string).collect())
            }

            Error::Store(e) => {
                // Log with structured context
                tracing::error!(
                    operation = %e.operation,
                    kind = %e.kind,
                    retriable = e.is_retriable(),
                    "Store error: {}", e.message
                );

                // User-facing message (don't expose internal details)
                let message = match e.kind {
                    StoreErrorKind::ConnectionFailed | StoreErrorKind::Timeout => {
                        "Database temporarily unavailable"
                    }
                    _ => "Database operation failed",
                };
                ErrorResponse::internal(message)
            }

            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                ErrorResponse::internal("Internal server error")
            }

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                ErrorResponse::internal("Internal server error")
            }

            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse::internal(msg.clone())
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.to_response().into_response()
    }
}
