//! # Reviews API
//!
//! ## Endpoints
//!
//! - `POST /reviews` — add a review (bearer)
//! - `PUT /reviews/:id` — change rating and/or comment (bearer)
//! - `DELETE /reviews/:id` — remove (bearer)
//!
//! Ratings are integers from 1 to 5, checked on create and on update.

use artisan_core::{EntityKind, NewReview, Review, ReviewChanges};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Authenticated;
use crate::error::AppError;
use crate::extractors::{extract_id, extract_json, extract_validated_json, RequiredFields, Validate};
use crate::routes::MessageResponse;
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to add a review.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub product_id: Option<u64>,
    pub customer_id: Option<u64>,
    /// 1 to 5 inclusive.
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

impl Validate for CreateReviewRequest {
    type Output = NewReview;

    fn validate(self) -> Result<NewReview, AppError> {
        let mut fields = RequiredFields::new();
        let product_id = fields.take("product_id", self.product_id);
        let customer_id = fields.take("customer_id", self.customer_id);
        let rating = fields.take("rating", self.rating);
        let comment = fields.take("comment", self.comment);

        match (product_id, customer_id, rating, comment) {
            (Some(product_id), Some(customer_id), Some(rating), Some(comment)) => Ok(NewReview {
                product_id,
                customer_id,
                rating,
                comment,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

impl From<UpdateReviewRequest> for ReviewChanges {
    fn from(req: UpdateReviewRequest) -> Self {
        Self {
            rating: req.rating,
            comment: req.comment,
        }
    }
}

/// Projection returned by create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewCreated {
    pub id: u64,
    pub product_id: u64,
    pub rating: i64,
}

impl From<Review> for ReviewCreated {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            product_id: review.product_id,
            rating: review.rating.value(),
        }
    }
}

/// Projection returned by update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewUpdated {
    pub id: u64,
    pub rating: i64,
    pub comment: String,
}

impl From<Review> for ReviewUpdated {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            rating: review.rating.value(),
            comment: review.comment,
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the reviews router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(create_review))
        .route("/reviews/:id", put(update_review).delete(delete_review))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /reviews — Add a review.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewCreated),
        (status = 400, description = "Missing field or rating out of range", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
async fn create_review(
    _auth: Authenticated,
    State(state): State<AppState>,
    body: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewCreated>), AppError> {
    let input = extract_validated_json(body)?;
    let review = state.reviews.add_review(input)?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

/// PUT /reviews/:id — Update a review.
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    params(("id" = u64, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewUpdated),
        (status = 400, description = "Rating out of range", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 404, description = "Review not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
async fn update_review(
    _auth: Authenticated,
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<UpdateReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewUpdated>, AppError> {
    let id = extract_id(id)?;
    let changes = extract_json(body)?;
    let review = state.reviews.update_review(id, changes.into())?;
    Ok(Json(review.into()))
}

/// DELETE /reviews/:id — Remove a review.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = u64, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 404, description = "Review not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
async fn delete_review(
    _auth: Authenticated,
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = extract_id(id)?;
    state.reviews.delete_review(id)?;
    Ok(Json(MessageResponse::deleted(EntityKind::Review)))
}
