//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from artisan-core to HTTP status codes. Every error
//! response body has the shape `{"error": "<message>"}`.
//! Internal error details are never exposed to clients.

use artisan_core::DomainError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body or path could not be parsed (400).
    #[error("{0}")]
    BadRequest(String),

    /// A required field is missing or a field value is unacceptable (400).
    #[error("{0}")]
    Validation(String),

    /// An entity construction rule was violated (400).
    #[error("{0}")]
    Invariant(String),

    /// Uniqueness conflict, e.g. a taken artisan email (400).
    #[error("{0}")]
    Duplicate(String),

    /// Missing or invalid bearer token (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Invariant(_) => (StatusCode::BAD_REQUEST, "INVARIANT_ERROR"),
            Self::Duplicate(_) => (StatusCode::BAD_REQUEST, "DUPLICATE_ERROR"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, code, "internal server error");
                "An internal error occurred".to_string()
            }
            other => {
                tracing::debug!(error = %other, code, status = status.as_u16(), "request rejected");
                other.to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Convert artisan-core domain errors to API errors.
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::InvalidPrice { .. } | DomainError::InvalidRating { .. } => {
                Self::Invariant(err.to_string())
            }
            DomainError::MissingFields(_) | DomainError::Validation(_) => {
                Self::Validation(err.to_string())
            }
            DomainError::DuplicateEmail { .. } => Self::Duplicate(err.to_string()),
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
        }
    }
}
