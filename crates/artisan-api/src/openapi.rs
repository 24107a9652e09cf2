//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the shared-secret bearer scheme to the OpenAPI spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Process-wide shared secret. Set via the AUTH_TOKEN env var.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Artisan Link API",
        version = "0.1.0",
        description = "Marketplace backend for artisans, their products, customer orders and product reviews.\n\nAuthentication: `Authorization: Bearer <token>` on artisan mutations and on every order and review endpoint. Product endpoints, the artisan listing, health probes and metrics are open.",
        license(name = "MIT")
    ),
    paths(
        // Products
        crate::routes::products::list_products,
        crate::routes::products::add_product,
        // Artisans
        crate::routes::artisans::list_artisans,
        crate::routes::artisans::create_artisan,
        crate::routes::artisans::update_artisan,
        crate::routes::artisans::delete_artisan,
        // Orders
        crate::routes::orders::create_order,
        crate::routes::orders::get_order,
        crate::routes::orders::update_order,
        crate::routes::orders::delete_order,
        // Reviews
        crate::routes::reviews::create_review,
        crate::routes::reviews::update_review,
        crate::routes::reviews::delete_review,
        // Operations
        crate::middleware::metrics::metrics_snapshot,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::MessageResponse,
        crate::routes::products::CreateProductRequest,
        crate::routes::products::ProductResponse,
        crate::routes::artisans::CreateArtisanRequest,
        crate::routes::artisans::UpdateArtisanRequest,
        crate::routes::artisans::ArtisanResponse,
        crate::routes::orders::OrderProductInput,
        crate::routes::orders::CreateOrderRequest,
        crate::routes::orders::UpdateOrderRequest,
        crate::routes::orders::OrderSummary,
        crate::routes::orders::OrderResponse,
        crate::routes::reviews::CreateReviewRequest,
        crate::routes::reviews::UpdateReviewRequest,
        crate::routes::reviews::ReviewCreated,
        crate::routes::reviews::ReviewUpdated,
        crate::middleware::metrics::MetricsSnapshot,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "products", description = "Product catalogue"),
        (name = "artisans", description = "Artisan registry"),
        (name = "orders", description = "Customer orders"),
        (name = "reviews", description = "Product reviews"),
        (name = "operations", description = "Process metrics"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Artisan Link API");
    }

    #[test]
    fn spec_has_every_resource_path() {
        let spec = ApiDoc::openapi();
        for path in [
            "/products",
            "/artisans",
            "/artisans/{id}",
            "/orders",
            "/orders/{id}",
            "/reviews",
            "/reviews/{id}",
            "/metrics",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn spec_registers_bearer_scheme() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
