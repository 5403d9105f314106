//! Customer index.
//!
//! - [`CustomerIndex`]: binary search tree keyed by customer id
//! - [`PromotionPolicy`]: how `promote` moves a customer toward the root,
//!   chosen when the index is built
//!
//! Both policies keep the tree ordered. [`PromotionPolicy::Rotate`] lifts
//! the customer to the root; [`PromotionPolicy::Splice`] lifts it one level.

pub mod index;
pub mod promote;

pub use index::{CustomerIndex, PromotionOutcome};
pub use promote::{PromotionPolicy, UnknownPolicy};
