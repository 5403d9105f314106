//! Error type shared by every store component.
//!
//! Absent lookups that are naturally optional (`HashIndex::get`,
//! `OrderQueue::dequeue`, `CustomerIndex::find`) return `Option` instead.
//! `StoreError` covers operations whose failure the caller must act on.

use thiserror::Error;

/// Failures reported by store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No product with this id is reachable in the carousel
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// A product with this id is already in the carousel
    #[error("product already listed: {0}")]
    DuplicateProduct(String),

    /// The cart holds no entry for this product
    #[error("product not in cart: {0}")]
    NotInCart(String),

    /// Order submission with nothing tracked in the cart
    #[error("cart is empty")]
    EmptyCart,

    /// Undo requested with an empty undo ledger
    #[error("no cart action to undo")]
    NothingToUndo,

    /// No customer with this id in the index
    #[error("customer not found: {0}")]
    CustomerNotFound(u64),

    /// A customer with this id is already indexed
    #[error("customer already exists: {0}")]
    DuplicateCustomer(u64),

    /// A cart add asked for zero units
    #[error("quantity must be positive for product {0}")]
    InvalidQuantity(String),

    /// Programmer error: a structure was used in a state that forbids the call
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
