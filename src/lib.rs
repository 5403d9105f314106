//! # BrightCart
//!
//! In-memory catalog, cart and customer engine for a small storefront.
//!
//! ## Architecture
//!
//! - **Carousel**: Doubly-linked product list with a featured front window and cycle repair
//! - **Cart**: Chained hash table of quantities, undo ledger and order submission
//! - **Orders**: FIFO order queue where VIP orders jump one position
//! - **Customers**: Binary search tree with selectable promotion policy
//! - **Recommend**: Undirected product relation graph
//! - **Storefront**: Facade that runs commands and publishes events
//!
//! ## Design Principles
//!
//! 1. **No I/O in the core**: Mutations emit [`StoreEvent`]s; observers decide what to do with them
//! 2. **Arena links**: List and tree nodes live in slabs and link by key
//! 3. **Bounded traversal**: Every walk over a possibly corrupted list stops after `len` steps
//! 4. **Single writer**: Components are `Send` and unsynchronised; share them behind one `Mutex`

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Product, Order, Customer, CartAction
pub mod types;

/// Error type and result alias
pub mod error;

/// Store configuration
pub mod config;

/// Structured events and observers
pub mod events;

/// Product carousel
pub mod carousel;

/// Cart, hash index and undo ledger
pub mod cart;

/// Order queue
pub mod orders;

/// Customer index
pub mod customers;

/// Product relation graph
pub mod recommend;

/// Command facade
pub mod storefront;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use carousel::{ProductCarousel, Validation};
pub use cart::{CartLedger, HashIndex, UndoLedger};
pub use config::{ConfigError, StoreConfig};
pub use customers::{CustomerIndex, PromotionOutcome, PromotionPolicy};
pub use error::{Result, StoreError};
pub use events::{StoreEvent, StoreObserver, TracingObserver};
pub use orders::OrderQueue;
pub use recommend::RecommendationGraph;
pub use storefront::{Command, Reply, Storefront};
pub use types::{Customer, Order, OrderReceipt, Product};
