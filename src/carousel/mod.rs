//! Product carousel module.
//!
//! ## Components
//!
//! - [`ProductNode`]: `Product` plus doubly-linked list links (slab keys)
//! - [`ProductCarousel`]: The ordered list, its featured window and cycle repair
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add front / end | O(1) + placement pass |
//! | Remove / move to front | O(n) scan + placement pass |
//! | Placement pass | O(window × n) |
//! | Validate | O(n) |

pub mod list;
pub mod node;

pub use list::{CycleRepair, Iter, ProductCarousel, Validation};
pub use node::ProductNode;
