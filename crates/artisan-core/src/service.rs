//! # Service Layer
//!
//! One service per entity type, each wrapping an injected [`Repository`].
//! Services own the business rules that span more than one record (email
//! uniqueness among artisans) and the partial-update semantics of PUT.
//!
//! Cross-entity references are not checked: an order may name a
//! product id that does not exist, and a review may point at any product or
//! customer id.

use crate::entity::{Artisan, Order, Product, Rating, Review};
use crate::error::{DomainError, EntityKind};
use crate::repository::{InMemoryRepository, Repository};

// -- Inputs -------------------------------------------------------------------

/// Fields for a new artisan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtisan {
    pub name: String,
    pub email: String,
}

/// Partial artisan update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtisanChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Fields for a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_id: u64,
    pub products: Vec<Product>,
    pub total: f64,
}

/// Partial order update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub customer_id: Option<u64>,
    pub products: Option<Vec<Product>>,
    pub total: Option<f64>,
}

/// Fields for a new review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub product_id: u64,
    pub customer_id: u64,
    pub rating: i64,
    pub comment: String,
}

/// Partial review update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewChanges {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

fn require_non_blank(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

// -- Products -----------------------------------------------------------------

/// Product catalogue.
#[derive(Debug, Clone, Default)]
pub struct ProductService<R = InMemoryRepository<Product>> {
    repo: R,
}

impl<R: Repository<Product>> ProductService<R> {
    /// Wrap a product repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Every product in insertion order.
    pub fn list_products(&self) -> Vec<Product> {
        self.repo.list_all()
    }

    /// Store a product under its caller-supplied id. A product with the same
    /// id is replaced and returned.
    pub fn add_product(&self, product: Product) -> Option<Product> {
        let id = product.id;
        let replaced = self.repo.save(product);
        tracing::info!(product_id = id, replaced = replaced.is_some(), "product saved");
        replaced
    }
}

// -- Artisans -----------------------------------------------------------------

/// Artisan registry. Emails are unique across all stored artisans.
#[derive(Debug, Clone, Default)]
pub struct ArtisanService<R = InMemoryRepository<Artisan>> {
    repo: R,
}

impl<R: Repository<Artisan>> ArtisanService<R> {
    /// Wrap an artisan repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Every artisan in insertion order.
    pub fn list_artisans(&self) -> Vec<Artisan> {
        self.repo.list_all()
    }

    /// Fetch one artisan.
    pub fn get_artisan(&self, id: u64) -> Result<Artisan, DomainError> {
        self.repo
            .get(id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Artisan, id))
    }

    /// Register an artisan under the next id.
    ///
    /// The uniqueness check and the insert happen under one write lock.
    pub fn create_artisan(&self, input: NewArtisan) -> Result<Artisan, DomainError> {
        require_non_blank("name", &input.name)?;
        require_non_blank("email", &input.email)?;

        let artisan = self.repo.write(|table| {
            if table.iter().any(|a| a.email == input.email) {
                return Err(DomainError::DuplicateEmail { email: input.email });
            }
            Ok(table.insert_new(Artisan::new(0, input.name, input.email)))
        })?;

        tracing::info!(artisan_id = artisan.id, "artisan created");
        Ok(artisan)
    }

    /// Apply a partial update. A new email must not belong to any other
    /// artisan; keeping one's own email is allowed. An unknown id is
    /// reported before any field is checked.
    pub fn update_artisan(&self, id: u64, changes: ArtisanChanges) -> Result<Artisan, DomainError> {
        let artisan = self.repo.write(|table| {
            if table.get(id).is_none() {
                return Err(DomainError::not_found(EntityKind::Artisan, id));
            }
            if let Some(name) = &changes.name {
                require_non_blank("name", name)?;
            }
            if let Some(email) = &changes.email {
                require_non_blank("email", email)?;
                if table.iter().any(|a| a.id != id && &a.email == email) {
                    return Err(DomainError::DuplicateEmail {
                        email: email.clone(),
                    });
                }
            }
            let artisan = table
                .get_mut(id)
                .ok_or_else(|| DomainError::not_found(EntityKind::Artisan, id))?;
            if let Some(name) = changes.name {
                artisan.name = name;
            }
            if let Some(email) = changes.email {
                artisan.email = email;
            }
            Ok(artisan.clone())
        })?;

        tracing::info!(artisan_id = id, "artisan updated");
        Ok(artisan)
    }

    /// Remove an artisan.
    pub fn delete_artisan(&self, id: u64) -> Result<Artisan, DomainError> {
        let removed = self
            .repo
            .delete(id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Artisan, id))?;
        tracing::info!(artisan_id = id, "artisan deleted");
        Ok(removed)
    }
}

// -- Orders -------------------------------------------------------------------

/// Customer orders.
#[derive(Debug, Clone, Default)]
pub struct OrderService<R = InMemoryRepository<Order>> {
    repo: R,
}

impl<R: Repository<Order>> OrderService<R> {
    /// Wrap an order repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Store an order under the next id.
    pub fn create_order(&self, input: NewOrder) -> Order {
        let order = self.repo.insert_new(Order::new(
            0,
            input.customer_id,
            input.products,
            input.total,
        ));
        tracing::info!(
            order_id = order.id,
            customer_id = order.customer_id,
            items = order.products.len(),
            "order created"
        );
        order
    }

    /// Fetch one order with its products.
    pub fn get_order(&self, id: u64) -> Result<Order, DomainError> {
        self.repo
            .get(id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Order, id))
    }

    /// Apply a partial update.
    pub fn update_order(&self, id: u64, changes: OrderChanges) -> Result<Order, DomainError> {
        let order = self
            .repo
            .update(id, |order| {
                if let Some(customer_id) = changes.customer_id {
                    order.customer_id = customer_id;
                }
                if let Some(products) = changes.products {
                    order.products = products;
                }
                if let Some(total) = changes.total {
                    order.total = total;
                }
                Ok::<_, DomainError>(order.clone())
            })
            .ok_or_else(|| DomainError::not_found(EntityKind::Order, id))??;
        tracing::info!(order_id = id, "order updated");
        Ok(order)
    }

    /// Remove an order.
    pub fn delete_order(&self, id: u64) -> Result<Order, DomainError> {
        let removed = self
            .repo
            .delete(id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Order, id))?;
        tracing::info!(order_id = id, "order deleted");
        Ok(removed)
    }
}

// -- Reviews ------------------------------------------------------------------

/// Product reviews.
#[derive(Debug, Clone, Default)]
pub struct ReviewService<R = InMemoryRepository<Review>> {
    repo: R,
}

impl<R: Repository<Review>> ReviewService<R> {
    /// Wrap a review repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Every review in insertion order.
    pub fn list_reviews(&self) -> Vec<Review> {
        self.repo.list_all()
    }

    /// Validate and store a review under the next id.
    pub fn add_review(&self, input: NewReview) -> Result<Review, DomainError> {
        let review = Review::new(
            0,
            input.product_id,
            input.customer_id,
            input.rating,
            input.comment,
        )?;
        let review = self.repo.insert_new(review);
        tracing::info!(
            review_id = review.id,
            product_id = review.product_id,
            "review added"
        );
        Ok(review)
    }

    /// Apply a partial update. An unknown id is reported before the rating
    /// is checked; an out-of-range rating leaves the review untouched.
    pub fn update_review(&self, id: u64, changes: ReviewChanges) -> Result<Review, DomainError> {
        let review = self
            .repo
            .update(id, |review| {
                if let Some(rating) = changes.rating.map(Rating::new).transpose()? {
                    review.rating = rating;
                }
                if let Some(comment) = changes.comment {
                    review.comment = comment;
                }
                Ok::<_, DomainError>(review.clone())
            })
            .ok_or_else(|| DomainError::not_found(EntityKind::Review, id))??;
        tracing::info!(review_id = id, "review updated");
        Ok(review)
    }

    /// Remove a review.
    pub fn delete_review(&self, id: u64) -> Result<Review, DomainError> {
        let removed = self
            .repo
            .delete(id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Review, id))?;
        tracing::info!(review_id = id, "review deleted");
        Ok(removed)
    }
}
