//! # Orders API
//!
//! ## Endpoints
//!
//! All order endpoints require the bearer token, reads included.
//!
//! - `POST /orders` — place an order
//! - `GET /orders/:id` — full order with its products
//! - `PUT /orders/:id` — partial update
//! - `DELETE /orders/:id` — remove
//!
//! Products inside an order are read leniently: only `id` is required and
//! extra keys such as `quantity` are ignored. Product ids are not checked
//! against the catalogue.

use artisan_core::{EntityKind, NewOrder, Order, OrderChanges, Product, DEFAULT_PRICE};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Authenticated;
use crate::error::AppError;
use crate::extractors::{extract_id, extract_json, extract_validated_json, RequiredFields, Validate};
use crate::routes::products::ProductResponse;
use crate::routes::MessageResponse;
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// A product line inside an order request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderProductInput {
    pub id: u64,
    #[serde(default)]
    pub artisan_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to 0 when omitted; must not be negative.
    pub price: Option<f64>,
}

impl TryFrom<OrderProductInput> for Product {
    type Error = AppError;

    fn try_from(input: OrderProductInput) -> Result<Self, Self::Error> {
        Ok(Product::new(
            input.id,
            input.artisan_id,
            input.name,
            input.description,
            input.price.unwrap_or(DEFAULT_PRICE),
        )?)
    }
}

fn order_products(inputs: Vec<OrderProductInput>) -> Result<Vec<Product>, AppError> {
    if inputs.is_empty() {
        return Err(AppError::Validation(
            "products must contain at least one product".to_string(),
        ));
    }
    inputs.into_iter().map(Product::try_from).collect()
}

/// Request to place an order.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Option<u64>,
    pub products: Option<Vec<OrderProductInput>>,
    pub total: Option<f64>,
}

impl Validate for CreateOrderRequest {
    type Output = NewOrder;

    fn validate(self) -> Result<NewOrder, AppError> {
        let mut fields = RequiredFields::new();
        let customer_id = fields.take("customer_id", self.customer_id);
        let products = fields.take("products", self.products);
        let total = fields.take("total", self.total);

        match (customer_id, products, total) {
            (Some(customer_id), Some(products), Some(total)) => Ok(NewOrder {
                customer_id,
                products: order_products(products)?,
                total,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub customer_id: Option<u64>,
    pub products: Option<Vec<OrderProductInput>>,
    pub total: Option<f64>,
}

impl Validate for UpdateOrderRequest {
    type Output = OrderChanges;

    fn validate(self) -> Result<OrderChanges, AppError> {
        Ok(OrderChanges {
            customer_id: self.customer_id,
            products: self.products.map(order_products).transpose()?,
            total: self.total,
        })
    }
}

/// Projection returned by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderSummary {
    pub id: u64,
    pub customer_id: u64,
    pub total: f64,
}

impl From<Order> for OrderSummary {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            total: order.total,
        }
    }
}

/// Full order, including its products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: u64,
    pub customer_id: u64,
    pub products: Vec<ProductResponse>,
    pub total: f64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            products: order.products.into_iter().map(ProductResponse::from).collect(),
            total: order.total,
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new().route("/orders", post(create_order)).route(
        "/orders/:id",
        get(get_order).put(update_order).delete(delete_order),
    )
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /orders — Place an order.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderSummary),
        (status = 400, description = "Missing or invalid field", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
async fn create_order(
    _auth: Authenticated,
    State(state): State<AppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderSummary>), AppError> {
    let input = extract_validated_json(body)?;
    let order = state.orders.create_order(input);
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/:id — Fetch an order with its products.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = u64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 404, description = "Order not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
async fn get_order(
    _auth: Authenticated,
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<OrderResponse>, AppError> {
    let id = extract_id(id)?;
    let order = state.orders.get_order(id)?;
    Ok(Json(order.into()))
}

/// PUT /orders/:id — Update an order's customer, products and/or total.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = u64, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderSummary),
        (status = 400, description = "Invalid field", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 404, description = "Order not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
async fn update_order(
    _auth: Authenticated,
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderSummary>, AppError> {
    let id = extract_id(id)?;
    let req = extract_json(body)?;
    // A missing order answers 404 whatever the body holds.
    state.orders.get_order(id)?;
    let changes = req.validate()?;
    let order = state.orders.update_order(id, changes)?;
    Ok(Json(order.into()))
}

/// DELETE /orders/:id — Remove an order.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = u64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 404, description = "Order not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
async fn delete_order(
    _auth: Authenticated,
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = extract_id(id)?;
    state.orders.delete_order(id)?;
    Ok(Json(MessageResponse::deleted(EntityKind::Order)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: u64, price: Option<f64>) -> OrderProductInput {
        OrderProductInput {
            id,
            artisan_id: 0,
            name: String::new(),
            description: String::new(),
            price,
        }
    }

    #[test]
    fn product_line_accepts_extra_keys() {
        let input: OrderProductInput =
            serde_json::from_str(r#"{"id": 1, "quantity": 2}"#).unwrap();
        let product = Product::try_from(input).unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.price.value(), DEFAULT_PRICE);
    }

    #[test]
    fn negative_line_price_rejected() {
        assert!(matches!(
            Product::try_from(line(1, Some(-1.0))),
            Err(AppError::Invariant(_))
        ));
    }

    #[test]
    fn create_requires_every_field() {
        let req = CreateOrderRequest {
            customer_id: Some(1),
            products: None,
            total: None,
        };
        match req.validate() {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "missing required fields: products, total");
            }
            other => panic!("expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn create_rejects_empty_product_list() {
        let req = CreateOrderRequest {
            customer_id: Some(1),
            products: Some(Vec::new()),
            total: Some(0.0),
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn update_keeps_products_absent() {
        let changes = UpdateOrderRequest {
            total: Some(120.0),
            ..UpdateOrderRequest::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.total, Some(120.0));
        assert!(changes.products.is_none());
    }

    #[test]
    fn full_response_carries_products() {
        let order = Order::new(4, 1, vec![Product::try_from(line(9, Some(5.0))).unwrap()], 5.0);
        let response = OrderResponse::from(order);
        assert_eq!(response.products.len(), 1);
        assert_eq!(response.products[0].id, 9);
    }
}
