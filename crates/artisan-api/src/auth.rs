//! # Authentication
//!
//! Bearer-token gate for the mutating artisan, order and review endpoints
//! (and for reading orders). Product endpoints and the artisan listing are
//! open.
//!
//! ## Token Format
//!
//! ```text
//! Authorization: Bearer {shared-secret}
//! ```
//!
//! There is one process-wide secret. No per-user identity, expiry or
//! scoping exists.
//!
//! ## Pluggability
//!
//! Handlers never look at headers. They take an [`Authenticated`] extractor,
//! which asks the [`Authenticator`] held in [`AppState`]. Swapping in per-user
//! tokens means providing another `Authenticator`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::error::AppError;
use crate::state::AppState;

/// Fixed message returned to clients for every authentication failure.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

// ── Principal ───────────────────────────────────────────────────────────────

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Who the caller is. The shared-secret gate cannot tell callers apart,
    /// so every caller gets [`Principal::SHARED_SECRET_SUBJECT`].
    pub subject: String,
}

impl Principal {
    /// Subject of callers admitted by [`SharedSecretAuthenticator`].
    pub const SHARED_SECRET_SUBJECT: &'static str = "shared-secret";

    fn shared_secret() -> Self {
        Self {
            subject: Self::SHARED_SECRET_SUBJECT.to_string(),
        }
    }
}

// ── Authenticator ───────────────────────────────────────────────────────────

/// Why a request was not authenticated. Only logged; clients always see
/// [`UNAUTHORIZED_MESSAGE`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header.
    #[error("missing authorization header")]
    MissingHeader,

    /// Header present but not `Bearer <token>`.
    #[error("authorization header must use Bearer scheme")]
    WrongScheme,

    /// Bearer token does not match.
    #[error("invalid bearer token")]
    InvalidToken,
}

impl From<AuthError> for AppError {
    fn from(_: AuthError) -> Self {
        Self::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }
}

/// Decides whether a request's headers identify an allowed caller.
pub trait Authenticator: std::fmt::Debug + Send + Sync {
    /// Authenticate the request, returning who the caller is.
    fn authorize(&self, headers: &HeaderMap) -> Result<Principal, AuthError>;
}

/// Compares the bearer token against one configured secret.
///
/// Custom `Debug` redacts the secret to prevent credential leakage in logs.
#[derive(Clone)]
pub struct SharedSecretAuthenticator {
    secret: String,
}

impl SharedSecretAuthenticator {
    /// Create an authenticator accepting `Bearer {secret}`.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for SharedSecretAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretAuthenticator")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Authenticator for SharedSecretAuthenticator {
    fn authorize(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::WrongScheme)?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or(AuthError::WrongScheme)?;

        if constant_time_token_eq(token, &self.secret) {
            Ok(Principal::shared_secret())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

/// Constant-time comparison of bearer tokens.
///
/// When lengths differ, performs a dummy comparison so timing does not
/// depend on where the mismatch is.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

// ── Extractor ───────────────────────────────────────────────────────────────

/// Proof that the request passed the [`Authenticator`].
///
/// Put it first in a handler's argument list: it runs before the body is
/// read, so a rejected request never reaches validation or the stores.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

#[axum::async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.authenticator.authorize(&parts.headers) {
            Ok(principal) => Ok(Self(principal)),
            Err(reason) => {
                tracing::warn!(
                    %reason,
                    method = %parts.method,
                    path = parts.uri.path(),
                    "authentication failed"
                );
                Err(reason.into())
            }
        }
    }
}
