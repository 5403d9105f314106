//! Core data types for the store.
//!
//! ## Types
//!
//! - [`Product`]: A catalog entry held by the carousel
//! - [`Order`]: A cart snapshot waiting in the order queue
//! - [`OrderReceipt`]: Summary emitted when an order is processed
//! - [`Customer`]: A customer profile held by the customer index
//! - [`CartAction`]: An undo record for one cart mutation

mod action;
mod customer;
mod order;
mod product;

pub use action::{ActionKind, CartAction};
pub use customer::Customer;
pub use order::{Order, OrderReceipt};
pub use product::Product;
