//! Shopping cart.
//!
//! - [`HashIndex`]: chained hash table holding product id → quantity
//! - [`UndoLedger`]: LIFO of cart mutations
//! - [`CartLedger`]: the cart API, which also owns the order queue

pub mod hash_index;
pub mod ledger;
pub mod undo;

pub use hash_index::HashIndex;
pub use ledger::CartLedger;
pub use undo::UndoLedger;
