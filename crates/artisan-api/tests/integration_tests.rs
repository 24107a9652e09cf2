//! # Integration Tests for artisan-api
//!
//! Drives the full router with `tower::ServiceExt::oneshot`: product
//! round trip, artisan registry with email uniqueness, order and review
//! CRUD, the bearer gate, error bodies, health probes, metrics and the
//! OpenAPI document.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use artisan_api::middleware::metrics::ApiMetrics;
use artisan_api::state::{AppConfig, AppState, DEFAULT_AUTH_TOKEN};

const AUTH: &str = "Bearer meu-token-secreto";

/// Helper: build the test app with the default shared secret.
fn test_app() -> Router {
    artisan_api::app(AppState::new())
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: send one request, returning status and parsed JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = auth {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let text = body_string(response).await;
    let json = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    };
    (status, json)
}

fn vaso() -> Value {
    json!({
        "id": 1,
        "artisan_id": 1,
        "name": "Vaso de Cerâmica",
        "description": "Vaso artesanal feito à mão",
        "price": 50.0
    })
}

fn joao() -> Value {
    json!({"name": "João", "email": "joao@x.com"})
}

fn order_body() -> Value {
    json!({
        "customer_id": 1,
        "products": [{"id": 1, "quantity": 2}],
        "total": 100.0
    })
}

fn review_body(rating: i64) -> Value {
    json!({
        "product_id": 1,
        "customer_id": 1,
        "rating": rating,
        "comment": "Excelente!"
    })
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Products -----------------------------------------------------------------

#[tokio::test]
async fn test_products_start_empty() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_product_round_trip() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/products", None, Some(vaso())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "Product added successfully"}));

    let (status, body) = send(&app, "GET", "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([vaso()]));
}

#[tokio::test]
async fn test_product_negative_price_rejected() {
    let app = test_app();
    let mut product = vaso();
    product["price"] = json!(-10.0);
    let (status, body) = send(&app, "POST", "/products", None, Some(product)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("negative"));

    let (_, body) = send(&app, "GET", "/products", None, None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_product_missing_fields_listed() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/products",
        None,
        Some(json!({"id": 1, "name": "Vaso"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "missing required fields: artisan_id, description, price"
    );
}

#[tokio::test]
async fn test_product_repost_same_id_replaces() {
    let app = test_app();
    send(&app, "POST", "/products", None, Some(vaso())).await;
    let mut cheaper = vaso();
    cheaper["price"] = json!(40.0);
    send(&app, "POST", "/products", None, Some(cheaper.clone())).await;

    let (_, body) = send(&app, "GET", "/products", None, None).await;
    assert_eq!(body, json!([cheaper]));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/products")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["error"].is_string());
}

// -- Artisans -----------------------------------------------------------------

#[tokio::test]
async fn test_create_artisan_then_duplicate_email() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/artisans", Some(AUTH), Some(joao())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1, "name": "João", "email": "joao@x.com"}));

    let (status, body) = send(
        &app,
        "POST",
        "/artisans",
        Some(AUTH),
        Some(json!({"name": "Outro", "email": "joao@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("joao@x.com"));

    let (_, body) = send(&app, "GET", "/artisans", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_artisan_missing_fields() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/artisans", Some(AUTH), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing required fields: name, email");
}

#[tokio::test]
async fn test_list_artisans_is_open() {
    let app = test_app();
    send(&app, "POST", "/artisans", Some(AUTH), Some(joao())).await;
    let (status, body) = send(&app, "GET", "/artisans", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 1, "name": "João", "email": "joao@x.com"}]));
}

#[tokio::test]
async fn test_update_artisan_is_partial() {
    let app = test_app();
    send(&app, "POST", "/artisans", Some(AUTH), Some(joao())).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/artisans/1",
        Some(AUTH),
        Some(json!({"name": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "X", "email": "joao@x.com"}));
}

#[tokio::test]
async fn test_update_artisan_to_taken_email_rejected() {
    let app = test_app();
    send(&app, "POST", "/artisans", Some(AUTH), Some(joao())).await;
    send(
        &app,
        "POST",
        "/artisans",
        Some(AUTH),
        Some(json!({"name": "Maria", "email": "maria@x.com"})),
    )
    .await;

    let (status, _) = send(
        &app,
        "PUT",
        "/artisans/2",
        Some(AUTH),
        Some(json!({"email": "joao@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        "/artisans/1",
        Some(AUTH),
        Some(json!({"email": "joao@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "keeping one's own email is allowed");
}

#[tokio::test]
async fn test_update_missing_artisan_is_404() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "PUT",
        "/artisans/42",
        Some(AUTH),
        Some(json!({"name": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_update_missing_artisan_with_blank_name_is_404() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "PUT",
        "/artisans/999",
        Some(AUTH),
        Some(json!({"name": " "})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Artisan 999 not found"}));
}

#[tokio::test]
async fn test_delete_artisan_then_ids_not_reused() {
    let app = test_app();
    send(&app, "POST", "/artisans", Some(AUTH), Some(joao())).await;

    let (status, body) = send(&app, "DELETE", "/artisans/1", Some(AUTH), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Artisan deleted successfully"}));

    let (status, _) = send(&app, "DELETE", "/artisans/1", Some(AUTH), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "POST", "/artisans", Some(AUTH), Some(joao())).await;
    assert_eq!(body["id"], 2);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = test_app();
    let (status, body) = send(&app, "DELETE", "/artisans/abc", Some(AUTH), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

// -- Orders -------------------------------------------------------------------

#[tokio::test]
async fn test_order_lifecycle() {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/orders", Some(AUTH), Some(order_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1, "customer_id": 1, "total": 100.0}));

    let (status, body) = send(&app, "GET", "/orders/1", Some(AUTH), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer_id"], 1);
    assert_eq!(body["total"], 100.0);
    assert_eq!(
        body["products"],
        json!([{"id": 1, "artisan_id": 0, "name": "", "description": "", "price": 0.0}])
    );

    let (status, body) = send(
        &app,
        "PUT",
        "/orders/1",
        Some(AUTH),
        Some(json!({"total": 120.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "customer_id": 1, "total": 120.0}));

    let (status, body) = send(&app, "DELETE", "/orders/1", Some(AUTH), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Order deleted successfully"}));

    let (status, _) = send(&app, "GET", "/orders/1", Some(AUTH), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_order_missing_data() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(AUTH),
        Some(json!({"customer_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing required fields: products, total");
}

#[tokio::test]
async fn test_delete_nonexistent_order_is_404() {
    let app = test_app();
    let (status, body) = send(&app, "DELETE", "/orders/999", Some(AUTH), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Order 999 not found"}));
}

#[tokio::test]
async fn test_update_missing_order_with_invalid_body_is_404() {
    let app = test_app();
    for body in [
        json!({"products": []}),
        json!({"products": [{"id": 1, "price": -5.0}]}),
    ] {
        let (status, response) = send(&app, "PUT", "/orders/999", Some(AUTH), Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response, json!({"error": "Order 999 not found"}));
    }
}

#[tokio::test]
async fn test_update_order_with_empty_products_is_400() {
    let app = test_app();
    send(&app, "POST", "/orders", Some(AUTH), Some(order_body())).await;
    let (status, _) = send(
        &app,
        "PUT",
        "/orders/1",
        Some(AUTH),
        Some(json!({"products": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, order) = send(&app, "GET", "/orders/1", Some(AUTH), None).await;
    assert_eq!(order["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_order_requires_auth() {
    let app = test_app();
    send(&app, "POST", "/orders", Some(AUTH), Some(order_body())).await;
    let (status, body) = send(&app, "GET", "/orders/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Unauthorized"}));
}

// -- Reviews ------------------------------------------------------------------

#[tokio::test]
async fn test_review_lifecycle() {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/reviews", Some(AUTH), Some(review_body(5))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1, "product_id": 1, "rating": 5}));

    let (status, body) = send(
        &app,
        "PUT",
        "/reviews/1",
        Some(AUTH),
        Some(json!({"rating": 4, "comment": "Bom"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "rating": 4, "comment": "Bom"}));

    let (status, body) = send(&app, "DELETE", "/reviews/1", Some(AUTH), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Review deleted successfully"}));

    let (status, _) = send(&app, "DELETE", "/reviews/1", Some(AUTH), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_rating_out_of_range() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/reviews", Some(AUTH), Some(review_body(6))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("between 1 and 5"));
}

#[tokio::test]
async fn test_review_update_revalidates_rating() {
    let app = test_app();
    send(&app, "POST", "/reviews", Some(AUTH), Some(review_body(5))).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/reviews/1",
        Some(AUTH),
        Some(json!({"rating": 0, "comment": "changed"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A valid update afterwards shows the comment was not changed by the rejected one.
    let (_, body) = send(
        &app,
        "PUT",
        "/reviews/1",
        Some(AUTH),
        Some(json!({"rating": 3})),
    )
    .await;
    assert_eq!(body, json!({"id": 1, "rating": 3, "comment": "Excelente!"}));
}

#[tokio::test]
async fn test_update_missing_review_with_bad_rating_is_404() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "PUT",
        "/reviews/999",
        Some(AUTH),
        Some(json!({"rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Review 999 not found"}));
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_mutations_without_token_are_401_and_store_nothing() {
    let app = test_app();

    let requests: [(&str, &str, Option<Value>); 9] = [
        ("POST", "/artisans", Some(joao())),
        ("PUT", "/artisans/1", Some(json!({"name": "X"}))),
        ("DELETE", "/artisans/1", None),
        ("POST", "/orders", Some(order_body())),
        ("PUT", "/orders/1", Some(json!({"total": 1.0}))),
        ("DELETE", "/orders/1", None),
        ("POST", "/reviews", Some(review_body(5))),
        ("PUT", "/reviews/1", Some(json!({"rating": 1}))),
        ("DELETE", "/reviews/1", None),
    ];
    for (method, uri, body) in requests {
        let (status, response) = send(&app, method, uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(response, json!({"error": "Unauthorized"}), "{method} {uri}");
    }

    let (_, artisans) = send(&app, "GET", "/artisans", None, None).await;
    assert_eq!(artisans, json!([]));

    // First authenticated creates still get id 1: nothing was stored before.
    let (_, order) = send(&app, "POST", "/orders", Some(AUTH), Some(order_body())).await;
    assert_eq!(order["id"], 1);
    let (_, review) = send(&app, "POST", "/reviews", Some(AUTH), Some(review_body(5))).await;
    assert_eq!(review["id"], 1);
}

#[tokio::test]
async fn test_tokenless_changes_leave_existing_records_untouched() {
    let app = test_app();
    send(&app, "POST", "/artisans", Some(AUTH), Some(joao())).await;
    send(&app, "POST", "/orders", Some(AUTH), Some(order_body())).await;
    send(&app, "POST", "/reviews", Some(AUTH), Some(review_body(5))).await;

    let (_, artisans_before) = send(&app, "GET", "/artisans", None, None).await;
    let (_, order_before) = send(&app, "GET", "/orders/1", Some(AUTH), None).await;

    let requests: [(&str, &str, Option<Value>); 6] = [
        ("PUT", "/artisans/1", Some(json!({"name": "X", "email": "x@x.com"}))),
        ("DELETE", "/artisans/1", None),
        ("PUT", "/orders/1", Some(json!({"customer_id": 2, "total": 1.0}))),
        ("DELETE", "/orders/1", None),
        ("PUT", "/reviews/1", Some(json!({"rating": 1, "comment": "Ruim"}))),
        ("DELETE", "/reviews/1", None),
    ];
    for (method, uri, body) in requests {
        let (status, _) = send(&app, method, uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    let (_, artisans_after) = send(&app, "GET", "/artisans", None, None).await;
    assert_eq!(artisans_after, artisans_before);
    let (_, order_after) = send(&app, "GET", "/orders/1", Some(AUTH), None).await;
    assert_eq!(order_after, order_before);

    // The review is still there with its original rating and comment: an
    // authenticated update of nothing but the comment echoes the stored rating.
    let (status, review) = send(
        &app,
        "PUT",
        "/reviews/1",
        Some(AUTH),
        Some(json!({"comment": "Excelente!"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(review, json!({"id": 1, "rating": 5, "comment": "Excelente!"}));
}

#[tokio::test]
async fn test_wrong_token_rejected() {
    let app = test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/artisans",
        Some("Bearer outro-token"),
        Some(joao()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/artisans", Some(DEFAULT_AUTH_TOKEN), Some(joao())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "scheme prefix is required");
}

#[tokio::test]
async fn test_configured_token_replaces_default() {
    let config = AppConfig {
        port: 8080,
        auth_token: "s3cret".to_string(),
    };
    let app = artisan_api::app(AppState::with_config(config));

    let (status, _) = send(&app, "POST", "/artisans", Some(AUTH), Some(joao())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/artisans", Some("Bearer s3cret"), Some(joao())).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_auth_checked_before_body_validation() {
    let app = test_app();
    let (status, _) = send(&app, "POST", "/reviews", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// -- Metrics & OpenAPI --------------------------------------------------------

#[tokio::test]
async fn test_metrics_count_requests_and_errors() {
    let metrics = ApiMetrics::new();
    let app = artisan_api::app_with_metrics(AppState::new(), metrics.clone());

    send(&app, "GET", "/products", None, None).await;
    send(&app, "DELETE", "/orders/1", Some(AUTH), None).await;
    assert_eq!(metrics.requests(), 2);
    assert_eq!(metrics.errors(), 1);

    let (status, body) = send(&app, "GET", "/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"requests": 2, "errors": 1}));
}

#[tokio::test]
async fn test_openapi_json_served() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/orders/{id}"].is_object());
}
