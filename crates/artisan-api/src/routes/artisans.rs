//! # Artisans API
//!
//! ## Endpoints
//!
//! - `GET /artisans` — list artisans (open)
//! - `POST /artisans` — register an artisan (bearer)
//! - `PUT /artisans/:id` — partial update (bearer)
//! - `DELETE /artisans/:id` — remove (bearer)
//!
//! Emails are unique among stored artisans; the check happens in
//! [`ArtisanService`](artisan_core::ArtisanService) under the store's lock.

use artisan_core::{Artisan, ArtisanChanges, EntityKind, NewArtisan};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Authenticated;
use crate::error::AppError;
use crate::extractors::{extract_id, extract_json, extract_validated_json, RequiredFields, Validate};
use crate::routes::MessageResponse;
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to register an artisan.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateArtisanRequest {
    pub name: Option<String>,
    /// Must not belong to another artisan.
    pub email: Option<String>,
}

impl Validate for CreateArtisanRequest {
    type Output = NewArtisan;

    fn validate(self) -> Result<NewArtisan, AppError> {
        let mut fields = RequiredFields::new();
        let name = fields.take_text("name", self.name);
        let email = fields.take_text("email", self.email);

        match (name, email) {
            (Some(name), Some(email)) => Ok(NewArtisan { name, email }),
            _ => Err(fields.into_error()),
        }
    }
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateArtisanRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateArtisanRequest> for ArtisanChanges {
    fn from(req: UpdateArtisanRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

/// An artisan as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArtisanResponse {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl From<Artisan> for ArtisanResponse {
    fn from(artisan: Artisan) -> Self {
        Self {
            id: artisan.id,
            name: artisan.name,
            email: artisan.email,
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the artisans router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/artisans", get(list_artisans).post(create_artisan))
        .route("/artisans/:id", put(update_artisan).delete(delete_artisan))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /artisans — List all artisans in insertion order.
#[utoipa::path(
    get,
    path = "/artisans",
    responses(
        (status = 200, description = "List of artisans", body = Vec<ArtisanResponse>),
    ),
    tag = "artisans"
)]
async fn list_artisans(State(state): State<AppState>) -> Json<Vec<ArtisanResponse>> {
    Json(
        state
            .artisans
            .list_artisans()
            .into_iter()
            .map(ArtisanResponse::from)
            .collect(),
    )
}

/// POST /artisans — Register an artisan.
#[utoipa::path(
    post,
    path = "/artisans",
    request_body = CreateArtisanRequest,
    responses(
        (status = 201, description = "Artisan created", body = ArtisanResponse),
        (status = 400, description = "Missing field or duplicate email", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "artisans"
)]
async fn create_artisan(
    _auth: Authenticated,
    State(state): State<AppState>,
    body: Result<Json<CreateArtisanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ArtisanResponse>), AppError> {
    let input = extract_validated_json(body)?;
    let artisan = state.artisans.create_artisan(input)?;
    Ok((StatusCode::CREATED, Json(artisan.into())))
}

/// PUT /artisans/:id — Update an artisan's name and/or email.
#[utoipa::path(
    put,
    path = "/artisans/{id}",
    params(("id" = u64, Path, description = "Artisan ID")),
    request_body = UpdateArtisanRequest,
    responses(
        (status = 200, description = "Artisan updated", body = ArtisanResponse),
        (status = 400, description = "Duplicate email", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 404, description = "Artisan not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "artisans"
)]
async fn update_artisan(
    _auth: Authenticated,
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<UpdateArtisanRequest>, JsonRejection>,
) -> Result<Json<ArtisanResponse>, AppError> {
    let id = extract_id(id)?;
    let changes = extract_json(body)?;
    let artisan = state.artisans.update_artisan(id, changes.into())?;
    Ok(Json(artisan.into()))
}

/// DELETE /artisans/:id — Remove an artisan.
#[utoipa::path(
    delete,
    path = "/artisans/{id}",
    params(("id" = u64, Path, description = "Artisan ID")),
    responses(
        (status = 200, description = "Artisan deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 404, description = "Artisan not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "artisans"
)]
async fn delete_artisan(
    _auth: Authenticated,
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = extract_id(id)?;
    state.artisans.delete_artisan(id)?;
    Ok(Json(MessageResponse::deleted(EntityKind::Artisan)))
}
