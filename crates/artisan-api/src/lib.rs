//! # artisan-api — Axum HTTP Service for the Artisan Link Marketplace
//!
//! Exposes the [`artisan_core`] services over HTTP/JSON without a version
//! prefix.
//!
//! ## API Surface
//!
//! | Prefix          | Module                 | Auth                          |
//! |-----------------|------------------------|-------------------------------|
//! | `/products`     | [`routes::products`]   | none                          |
//! | `/artisans/*`   | [`routes::artisans`]   | bearer, except `GET /artisans` |
//! | `/orders/*`     | [`routes::orders`]     | bearer                        |
//! | `/reviews/*`    | [`routes::reviews`]    | bearer                        |
//! | `/health/*`     | this module            | none                          |
//! | `/metrics`      | [`middleware::metrics`] | none                         |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → BodyLimit → Handler (Authenticated extractor)
//! ```
//!
//! Authentication is not a layer: handlers that need it take the
//! [`auth::Authenticated`] extractor.
//!
//! ## OpenAPI
//!
//! Generated via utoipa derive macros and served at `/openapi.json`.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    app_with_metrics(state, ApiMetrics::new())
}

/// Like [`app`], with caller-owned metrics counters.
pub fn app_with_metrics(state: AppState, metrics: ApiMetrics) -> Router {
    let api = Router::new()
        .merge(routes::products::router())
        .merge(routes::artisans::router())
        .merge(routes::orders::router())
        .merge(routes::reviews::router())
        .merge(middleware::metrics::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(metrics))
        .with_state(state);

    // Health probes stay outside the metrics and tracing layers.
    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the stores are in memory, so ready as soon as serving.
async fn readiness() -> &'static str {
    "ready"
}
