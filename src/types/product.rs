//! Catalog product.
//!
//! ## Decimal Fields
//!
//! Price, discount and rating use `rust_decimal::Decimal` so catalog values
//! never pick up binary floating-point noise. The carousel does not interpret
//! them; they travel with the product unchanged.

use rust_decimal::Decimal;
use serde::Serialize;

/// A product listed in the carousel.
///
/// ## Example
///
/// ```
/// use brightcart::types::Product;
/// use rust_decimal::Decimal;
///
/// let product = Product::new("P1", "Desk Lamp", Decimal::new(2499, 2), true)
///     .with_category("lighting")
///     .with_stock(12);
///
/// assert!(product.featured);
/// assert_eq!(product.price.to_string(), "24.99");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Unique product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Flagged for front-of-carousel placement
    pub featured: bool,

    /// Catalog category
    pub category: String,

    /// Units on hand
    pub stock: u32,

    /// Discount fraction (0.15 = 15% off)
    pub discount: Decimal,

    /// Average customer rating
    pub rating: Decimal,
}

impl Product {
    /// Create a product with empty category, zero stock, discount and rating.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        featured: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            featured,
            category: String::new(),
            stock: 0,
            discount: Decimal::ZERO,
            rating: Decimal::ZERO,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_rating(mut self, rating: Decimal) -> Self {
        self.rating = rating;
        self
    }

    /// Check if any units are on hand
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
