//! # Entity Model
//!
//! Passive records for the four marketplace entities. Invariants live in
//! the validated newtypes [`Price`] and [`Rating`]: a [`Product`] or
//! [`Review`] holding one cannot be in an invalid state, whether it was
//! built through its constructor or deserialized.
//!
//! Construction is pure. No I/O happens here.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Price applied when a product representation omits one.
pub const DEFAULT_PRICE: f64 = 0.0;

/// Lowest accepted review rating.
pub const MIN_RATING: i64 = 1;

/// Highest accepted review rating.
pub const MAX_RATING: i64 = 5;

/// A record that repositories can key by a numeric id.
pub trait Record: Clone + Send + Sync + 'static {
    /// The record's id.
    fn id(&self) -> u64;

    /// Overwrite the record's id (used when the repository assigns one).
    fn set_id(&mut self, id: u64);
}

// -- Validated values ---------------------------------------------------------

/// Non-negative, finite product price.
///
/// Serializes as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    /// Validate a raw price.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::InvalidPrice { price: value });
        }
        Ok(Self(value))
    }

    /// Return the price as a float.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// Review rating in `MIN_RATING..=MAX_RATING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(i64);

impl Rating {
    /// Validate a raw rating.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(DomainError::InvalidRating { rating: value });
        }
        Ok(Self(value))
    }

    /// Return the rating as an integer.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

// -- Entities -----------------------------------------------------------------

/// A seller, identified by a unique email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artisan {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl Artisan {
    /// Create an artisan. Presence of `name` and `email` is checked by callers.
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// An item listed by an artisan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub artisan_id: u64,
    pub name: String,
    pub description: String,
    pub price: Price,
}

impl Product {
    /// Create a product, failing with [`DomainError::InvalidPrice`] when
    /// `price` is negative.
    pub fn new(
        id: u64,
        artisan_id: u64,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            artisan_id,
            name: name.into(),
            description: description.into(),
            price: Price::new(price)?,
        })
    }
}

/// A customer's purchase of one or more products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub customer_id: u64,
    pub products: Vec<Product>,
    pub total: f64,
}

impl Order {
    /// Create an order. Presence of every field is checked by callers.
    pub fn new(id: u64, customer_id: u64, products: Vec<Product>, total: f64) -> Self {
        Self {
            id,
            customer_id,
            products,
            total,
        }
    }
}

/// A customer's rating and comment on a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub product_id: u64,
    pub customer_id: u64,
    pub rating: Rating,
    pub comment: String,
}

impl Review {
    /// Create a review, failing with [`DomainError::InvalidRating`] when
    /// `rating` is outside 1..=5.
    pub fn new(
        id: u64,
        product_id: u64,
        customer_id: u64,
        rating: i64,
        comment: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            product_id,
            customer_id,
            rating: Rating::new(rating)?,
            comment: comment.into(),
        })
    }
}

macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> u64 {
                    self.id
                }

                fn set_id(&mut self, id: u64) {
                    self.id = id;
                }
            }
        )+
    };
}

impl_record!(Artisan, Product, Order, Review);
