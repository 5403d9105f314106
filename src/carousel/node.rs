//! Product node for slab-based storage.
//!
//! ## Design
//!
//! `ProductNode` wraps a `Product` with doubly-linked list links. Links are
//! slab keys (`usize`), not references, so relinking during cycle repair or
//! the featured placement pass is plain index arithmetic.
//!
//! ## Linked List
//!
//! - `next`: Points toward the tail of the carousel
//! - `prev`: Points toward the head of the carousel
//!
//! Nodes never point into another carousel's slab.

use crate::types::Product;

/// Carousel node stored in the slab.
#[derive(Debug, Clone)]
pub struct ProductNode {
    /// The product data
    pub product: Product,

    /// Next node toward the tail (slab key)
    /// None if this is the tail
    pub next: Option<usize>,

    /// Previous node toward the head (slab key)
    /// None if this is the head
    pub prev: Option<usize>,
}

impl ProductNode {
    /// Create a new, unlinked node
    ///
    /// # Example
    ///
    /// ```
    /// use brightcart::carousel::ProductNode;
    /// use brightcart::types::Product;
    /// use rust_decimal::Decimal;
    ///
    /// let node = ProductNode::new(Product::new("P1", "Lamp", Decimal::ONE, false));
    ///
    /// assert!(node.is_unlinked());
    /// assert_eq!(node.product_id(), "P1");
    /// ```
    #[inline]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            next: None,
            prev: None,
        }
    }

    /// Check if this node has no neighbours
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    #[inline]
    pub fn is_featured(&self) -> bool {
        self.product.featured
    }
}
