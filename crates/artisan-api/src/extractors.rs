//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to extract
//! and validate JSON bodies and path ids in handlers. Every rejection becomes
//! an [`AppError`], so clients always get the `{"error": ...}` body.

use artisan_core::DomainError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;

use crate::error::AppError;

/// Request types that turn into a validated domain input.
///
/// Request DTOs keep their required fields as `Option` so that every absent
/// field can be reported at once instead of failing on the first one.
pub trait Validate {
    /// The domain input produced once the request is accepted.
    type Output;

    /// Check required fields and business rules, consuming the request.
    fn validate(self) -> Result<Self::Output, AppError>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
///     // use req...
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T::Output, AppError> {
    extract_json(result)?.validate()
}

/// Extract a numeric path id, mapping a malformed one to [`AppError::BadRequest`].
pub fn extract_id(result: Result<Path<u64>, PathRejection>) -> Result<u64, AppError> {
    result
        .map(|Path(id)| id)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Collects the names of absent required fields while a request is validated.
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<String>,
}

impl RequiredFields {
    /// Start with nothing missing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass `value` through, recording `name` when it is absent.
    pub fn take<T>(&mut self, name: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(name.to_string());
        }
        value
    }

    /// Like [`take`](Self::take), but a whitespace-only string also counts as absent.
    pub fn take_text(&mut self, name: &str, value: Option<String>) -> Option<String> {
        let value = value.filter(|text| !text.trim().is_empty());
        self.take(name, value)
    }

    /// The missing-fields error for everything recorded so far.
    pub fn into_error(self) -> AppError {
        DomainError::MissingFields(self.missing).into()
    }
}
