//! # Error Hierarchy
//!
//! Structured domain errors built with `thiserror`. Entity constructors,
//! repositories and services all fail with [`DomainError`]; the HTTP layer
//! decides how each variant is presented to clients.

use thiserror::Error;

/// Kind of entity a lookup refers to, used in not-found diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// An [`Artisan`](crate::entity::Artisan).
    Artisan,
    /// A [`Product`](crate::entity::Product).
    Product,
    /// An [`Order`](crate::entity::Order).
    Order,
    /// A [`Review`](crate::entity::Review).
    Review,
}

impl EntityKind {
    /// Return the display name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artisan => "Artisan",
            Self::Product => "Product",
            Self::Order => "Order",
            Self::Review => "Review",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the domain layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Product price below zero (or not a finite number).
    #[error("product price must not be negative (got {price})")]
    InvalidPrice {
        /// The rejected price.
        price: f64,
    },

    /// Review rating outside the inclusive 1..=5 range.
    #[error("rating must be between 1 and 5 (got {rating})")]
    InvalidRating {
        /// The rejected rating.
        rating: i64,
    },

    /// Another artisan already uses this email.
    #[error("an artisan with email {email} already exists")]
    DuplicateEmail {
        /// The conflicting email address.
        email: String,
    },

    /// No entity of the given kind has this id.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity kind that was looked up.
        kind: EntityKind,
        /// The id that missed.
        id: u64,
    },

    /// One or more required fields were absent from the input.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A field was present but unacceptable.
    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    /// Whether this error is an entity construction invariant violation,
    /// as opposed to a request-level validation failure.
    pub fn is_invariant(&self) -> bool {
        matches!(self, Self::InvalidPrice { .. } | Self::InvalidRating { .. })
    }

    pub(crate) fn not_found(kind: EntityKind, id: u64) -> Self {
        Self::NotFound { kind, id }
    }
}
