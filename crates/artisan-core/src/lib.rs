//! # artisan-core — Domain Model for the Artisan Link Marketplace
//!
//! The HTTP-free core of the marketplace backend. It has no internal crate
//! dependencies and knows nothing about requests or responses.
//!
//! ## Layers (leaf first)
//!
//! 1. **[`entity`]**: [`Artisan`], [`Product`], [`Order`], [`Review`] and the
//!    validated values [`Price`] and [`Rating`] that carry their invariants.
//! 2. **[`repository`]**: the [`Repository`] port and the process-memory
//!    [`InMemoryRepository`]. Ids come from a per-table monotonic counter.
//! 3. **[`service`]**: one service per entity type; the place where rules
//!    spanning several records live.
//!
//! All fallible operations return [`DomainError`].

pub mod entity;
pub mod error;
pub mod repository;
pub mod service;

pub use entity::{Artisan, Order, Price, Product, Rating, Record, Review, DEFAULT_PRICE};
pub use error::{DomainError, EntityKind};
pub use repository::{InMemoryRepository, Repository, Table};
pub use service::{
    ArtisanChanges, ArtisanService, NewArtisan, NewOrder, NewReview, OrderChanges, OrderService,
    ProductService, ReviewChanges, ReviewService,
};
