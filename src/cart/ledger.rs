//! Shopping cart with undo and order submission.
//!
//! ## State
//!
//! - `items`: product id → quantity, in a [`HashIndex`]
//! - `tracked`: product ids in the order they were added (duplicates kept)
//! - `undo`: one [`CartAction`] per mutation since the last submission
//! - `queue`: submitted orders waiting to be processed
//!
//! ## Submission Boundary
//!
//! `submit_order` snapshots `tracked` into an [`Order`], queues it, then
//! clears `tracked` and discards the whole undo ledger. Mutations made before
//! a submission cannot be undone after it. Item quantities stay in the cart.
//!
//! ## Zero Quantities
//!
//! The cart never stores a zero quantity, so an undo record with a previous
//! quantity of 0 always means "no entry". Adding 0 units is rejected with
//! `InvalidQuantity` and updating to 0 removes the entry.

use crate::cart::{HashIndex, UndoLedger};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::events::{EventBuffer, StoreEvent};
use crate::orders::OrderQueue;
use crate::types::{ActionKind, CartAction, Order, OrderReceipt};

/// Cart mutation API over a hash index, an undo ledger and the order queue.
///
/// ## Example
///
/// ```
/// use brightcart::cart::CartLedger;
///
/// let mut cart = CartLedger::new();
/// cart.add_product("P1", 5).unwrap();
/// cart.add_product("P1", 3).unwrap();
/// assert_eq!(cart.quantity("P1"), Some(8));
///
/// cart.undo_last_action().unwrap();
/// assert_eq!(cart.quantity("P1"), Some(5));
/// ```
#[derive(Debug)]
pub struct CartLedger {
    items: HashIndex<String, u32>,
    tracked: Vec<String>,
    undo: UndoLedger,
    queue: OrderQueue,
    events: EventBuffer,
}

impl Default for CartLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CartLedger {
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            items: HashIndex::with_capacity(config.cart_capacity, config.cart_load_factor),
            tracked: Vec::new(),
            undo: UndoLedger::new(),
            queue: OrderQueue::new(),
            events: EventBuffer::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Quantity in the cart, `None` if the product has no entry
    pub fn quantity(&self, product_id: &str) -> Option<u32> {
        self.items.get(product_id).copied()
    }

    /// Cart entries sorted by product id
    pub fn items(&self) -> Vec<(&str, u32)> {
        let mut items: Vec<(&str, u32)> = self
            .items
            .iter()
            .map(|(id, qty)| (id.as_str(), *qty))
            .collect();
        items.sort_unstable_by(|a, b| a.0.cmp(b.0));
        items
    }

    /// Product ids that the next submission will snapshot
    pub fn tracked_ids(&self) -> &[String] {
        &self.tracked
    }

    /// Number of actions that can still be undone
    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pending_orders(&self) -> &OrderQueue {
        &self.queue
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add `quantity` units, merging with any existing entry.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` for 0 units; nothing is tracked or recorded.
    pub fn add_product(&mut self, product_id: &str, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(StoreError::InvalidQuantity(product_id.to_string()));
        }
        let previous = self.quantity(product_id).unwrap_or(0);
        let updated = previous.saturating_add(quantity);

        self.items.put(product_id.to_string(), updated);
        self.tracked.push(product_id.to_string());
        self.undo
            .push(CartAction::new(ActionKind::Add, product_id, previous, updated));

        tracing::debug!(product_id, quantity, total = updated, "cart item added");
        self.events.push(StoreEvent::CartItemAdded {
            product_id: product_id.to_string(),
            quantity,
        });
        Ok(())
    }

    /// Delete the entry for `product_id`
    pub fn remove_product(&mut self, product_id: &str) -> Result<()> {
        let previous = self
            .items
            .remove(product_id)
            .ok_or_else(|| StoreError::NotInCart(product_id.to_string()))?;

        self.undo
            .push(CartAction::new(ActionKind::Remove, product_id, previous, 0));

        tracing::debug!(product_id, "cart item removed");
        self.events.push(StoreEvent::CartItemRemoved {
            product_id: product_id.to_string(),
        });
        Ok(())
    }

    /// Overwrite the quantity of an existing entry; 0 removes it
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) -> Result<()> {
        let previous = self
            .quantity(product_id)
            .ok_or_else(|| StoreError::NotInCart(product_id.to_string()))?;

        if quantity == 0 {
            self.items.remove(product_id);
        } else {
            self.items.put(product_id.to_string(), quantity);
        }
        self.undo.push(CartAction::new(
            ActionKind::Update,
            product_id,
            previous,
            quantity,
        ));

        tracing::debug!(product_id, from = previous, to = quantity, "cart quantity updated");
        self.events.push(StoreEvent::CartQuantityUpdated {
            product_id: product_id.to_string(),
            quantity,
        });
        Ok(())
    }

    /// Revert the most recent mutation.
    ///
    /// # Errors
    ///
    /// `NothingToUndo` when no mutation happened since the last submission.
    pub fn undo_last_action(&mut self) -> Result<CartAction> {
        if self.undo.is_empty() {
            return Err(StoreError::NothingToUndo);
        }
        let action = self.undo.pop()?;

        match action.kind {
            ActionKind::Add => {
                if action.previous_quantity == 0 {
                    self.items.remove(action.product_id.as_str());
                } else {
                    self.items
                        .put(action.product_id.clone(), action.previous_quantity);
                }
                // The add no longer happened; retract its snapshot entry
                if let Some(pos) = self.tracked.iter().rposition(|id| *id == action.product_id) {
                    self.tracked.remove(pos);
                }
            }
            ActionKind::Remove | ActionKind::Update => {
                self.items
                    .put(action.product_id.clone(), action.previous_quantity);
            }
        }

        tracing::debug!(kind = ?action.kind, product_id = %action.product_id, "cart action undone");
        self.events.push(StoreEvent::UndoApplied {
            action: action.clone(),
        });
        Ok(action)
    }

    /// Revert up to `k` mutations, newest first. Returns how many were undone.
    pub fn undo_last_k(&mut self, k: usize) -> usize {
        let mut undone = 0;
        while undone < k && self.undo_last_action().is_ok() {
            undone += 1;
        }
        undone
    }

    /// Snapshot tracked products into an order and queue it.
    ///
    /// Returns the order's position in the queue.
    ///
    /// # Errors
    ///
    /// `EmptyCart` when nothing was added since the last submission; the
    /// cart is left untouched.
    pub fn submit_order(&mut self, order_id: &str, vip: bool) -> Result<usize> {
        if self.tracked.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        let order = Order::new(order_id, std::mem::take(&mut self.tracked), vip);
        let position = self.queue.enqueue(order);
        self.undo.clear();

        Ok(position)
    }

    /// Dequeue the front order and issue its receipt
    pub fn process_next_order(&mut self) -> Option<OrderReceipt> {
        let order = self.queue.dequeue()?;
        Some(OrderReceipt::from_order(&order))
    }

    /// Take cart and queue events recorded since the last drain.
    ///
    /// Each buffer keeps only its most recent events, so a cart that is never
    /// drained holds a bounded backlog.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        let mut events = self.events.drain();
        events.extend(self.queue.drain_events());
        events
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
