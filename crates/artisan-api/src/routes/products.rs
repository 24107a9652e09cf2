//! # Products API
//!
//! ## Endpoints
//!
//! - `GET /products` — list products
//! - `POST /products` — add (or replace) a product under a caller-supplied id

use artisan_core::Product;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, RequiredFields, Validate};
use crate::routes::MessageResponse;
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to add a product. Every field is required.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub id: Option<u64>,
    pub artisan_id: Option<u64>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Must not be negative.
    pub price: Option<f64>,
}

impl Validate for CreateProductRequest {
    type Output = Product;

    fn validate(self) -> Result<Product, AppError> {
        let mut fields = RequiredFields::new();
        let id = fields.take("id", self.id);
        let artisan_id = fields.take("artisan_id", self.artisan_id);
        let name = fields.take("name", self.name);
        let description = fields.take("description", self.description);
        let price = fields.take("price", self.price);

        match (id, artisan_id, name, description, price) {
            (Some(id), Some(artisan_id), Some(name), Some(description), Some(price)) => {
                Ok(Product::new(id, artisan_id, name, description, price)?)
            }
            _ => Err(fields.into_error()),
        }
    }
}

/// A product as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: u64,
    pub artisan_id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            artisan_id: product.artisan_id,
            name: product.name,
            description: product.description,
            price: product.price.value(),
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new().route("/products", get(list_products).post(add_product))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /products — List all products in insertion order.
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "List of products", body = Vec<ProductResponse>),
    ),
    tag = "products"
)]
async fn list_products(State(state): State<AppState>) -> Json<Vec<ProductResponse>> {
    Json(
        state
            .products
            .list_products()
            .into_iter()
            .map(ProductResponse::from)
            .collect(),
    )
}

/// POST /products — Add a product.
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product added", body = MessageResponse),
        (status = 400, description = "Missing field or negative price", body = crate::error::ErrorBody),
    ),
    tag = "products"
)]
async fn add_product(
    State(state): State<AppState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let product = extract_validated_json(body)?;
    state.products.add_product(product);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Product added successfully")),
    ))
}
