//! # API Route Modules
//!
//! One module per entity type. Paths carry no version prefix.
//!
//! - `products`: catalogue listing and product upsert (open).
//! - `artisans`: artisan registry; listing is open, mutations need the bearer token.
//! - `orders`: order CRUD, all behind the bearer token.
//! - `reviews`: review create/update/delete, all behind the bearer token.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod artisans;
pub mod orders;
pub mod products;
pub mod reviews;

/// Confirmation body for operations that return no entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// `"<Entity> deleted successfully"`.
    pub fn deleted(kind: artisan_core::EntityKind) -> Self {
        Self::new(format!("{kind} deleted successfully"))
    }
}
