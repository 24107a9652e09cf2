//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds one service per entity type (each owning its in-memory
//! repository), the [`Authenticator`] behind the bearer gate, and the
//! process configuration. Services clone cheaply: clones share the same
//! underlying tables.

use std::sync::Arc;

use artisan_core::{ArtisanService, OrderService, ProductService, ReviewService};
use thiserror::Error;

use crate::auth::{Authenticator, SharedSecretAuthenticator};

/// Shared secret used when `AUTH_TOKEN` is not set.
pub const DEFAULT_AUTH_TOKEN: &str = "meu-token-secreto";

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

// -- Configuration ------------------------------------------------------------

/// Error loading configuration from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `PORT` is not a valid TCP port.
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),

    /// `AUTH_TOKEN` is set but empty.
    #[error("AUTH_TOKEN must not be empty")]
    EmptyAuthToken,
}

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_token` to prevent credential leakage in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared secret expected in `Authorization: Bearer {auth_token}`.
    pub auth_token: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auth_token: DEFAULT_AUTH_TOKEN.to_string(),
        }
    }
}

impl AppConfig {
    /// Build configuration from `PORT` and `AUTH_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("PORT").ok(),
            std::env::var("AUTH_TOKEN").ok(),
        )
    }

    /// Build configuration from raw variable values (`None` = unset).
    pub fn from_vars(port: Option<String>, auth_token: Option<String>) -> Result<Self, ConfigError> {
        let port = match port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let auth_token = match auth_token {
            Some(token) if token.is_empty() => return Err(ConfigError::EmptyAuthToken),
            Some(token) => token,
            None => {
                tracing::warn!("AUTH_TOKEN not set, falling back to the built-in shared secret");
                DEFAULT_AUTH_TOKEN.to_string()
            }
        };

        Ok(Self { port, auth_token })
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state accessible to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub products: ProductService,
    pub artisans: ArtisanService,
    pub orders: OrderService,
    pub reviews: ReviewService,

    /// Gate consulted by the [`Authenticated`](crate::auth::Authenticated) extractor.
    pub authenticator: Arc<dyn Authenticator>,

    pub config: AppConfig,
}

impl AppState {
    /// Create state with default configuration and empty stores.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create state with empty stores, gated by the configured shared secret.
    pub fn with_config(config: AppConfig) -> Self {
        let authenticator = Arc::new(SharedSecretAuthenticator::new(config.auth_token.clone()));
        Self::with_authenticator(config, authenticator)
    }

    /// Create state with empty stores and a caller-provided authenticator.
    pub fn with_authenticator(config: AppConfig, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            products: ProductService::default(),
            artisans: ArtisanService::default(),
            orders: OrderService::default(),
            reviews: ReviewService::default(),
            authenticator,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
