//! Submitted orders and the receipt produced when one is processed.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// An order snapshot taken from the cart at submission time.
///
/// `product_ids` keeps cart insertion order; a product added twice appears
/// twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Caller-chosen order identifier
    pub id: String,

    /// Product ids in the order they were added to the cart
    pub product_ids: Vec<String>,

    /// VIP orders jump one position in the queue
    pub vip: bool,
}

impl Order {
    pub fn new(id: impl Into<String>, product_ids: Vec<String>, vip: bool) -> Self {
        Self {
            id: id.into(),
            product_ids,
            vip,
        }
    }

    /// Number of line entries in the snapshot
    #[inline]
    pub fn item_count(&self) -> usize {
        self.product_ids.len()
    }

    /// SHA-256 over the order id, VIP flag and product ids.
    ///
    /// Each string is length-prefixed so `["ab", "c"]` and `["a", "bc"]`
    /// hash differently.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.id.len() as u64).to_le_bytes());
        hasher.update(self.id.as_bytes());
        hasher.update([u8::from(self.vip)]);
        for product_id in &self.product_ids {
            hasher.update((product_id.len() as u64).to_le_bytes());
            hasher.update(product_id.as_bytes());
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }
}

/// Proof that an order left the queue for processing.
///
/// ## Example
///
/// ```
/// use brightcart::types::{Order, OrderReceipt};
///
/// let order = Order::new("O-1", vec!["P1".into(), "P2".into()], false);
/// let receipt = OrderReceipt::from_order(&order);
///
/// assert_eq!(receipt.item_count, 2);
/// assert_eq!(receipt.digest_hex().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReceipt {
    pub order_id: String,
    pub vip: bool,
    pub item_count: usize,

    /// SHA-256 of the order contents
    pub digest: [u8; 32],
}

impl OrderReceipt {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            vip: order.vip,
            item_count: order.item_count(),
            digest: order.digest(),
        }
    }

    /// Get the digest as a hex string
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}
