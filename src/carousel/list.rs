//! Product carousel: a doubly-linked, slab-backed product list.
//!
//! ## Queue Structure
//!
//! ```text
//! head (slot 0) <-> slot 1 <-> slot 2 <-> ... <-> tail
//! ```
//!
//! ## Featured Window
//!
//! The first `featured_window` slots (3 by default) belong to featured
//! products. Every mutating operation ends with a placement pass: walking the
//! window, each non-featured node found there makes the pass search further
//! down the list for the nearest featured node and relink it in front of the
//! non-featured one. Featured products therefore keep their relative list
//! order and end up ahead of every non-featured product in the window.
//!
//! ## Cycle Repair
//!
//! [`ProductCarousel::validate`] runs tortoise/hare detection over the
//! forward links. A detected cycle is broken by cutting the forward link of
//! the cycle start's predecessor; back links and the tail are then re-derived
//! from the head. Nodes no longer reachable from the head are released from
//! the arena and reported as dropped: that data is lost.

use rustc_hash::FxHashSet;
use slab::Slab;

use crate::carousel::ProductNode;
use crate::config::DEFAULT_FEATURED_WINDOW;
use crate::error::{Result, StoreError};
use crate::events::{EventBuffer, Placement, StoreEvent};
use crate::types::Product;

/// Outcome of [`ProductCarousel::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Forward links reach the tail without revisiting a node
    NoCycle,
    /// A cycle was found and cut
    Repaired(CycleRepair),
}

/// Details of a cycle repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleRepair {
    /// Product id of the first node on the cycle
    pub cycle_start: String,
    /// Products that were unreachable from the head and have been released
    pub dropped: Vec<String>,
}

/// Ordered product list with a featured-first front window.
///
/// ## Example
///
/// ```
/// use brightcart::carousel::ProductCarousel;
/// use brightcart::types::Product;
/// use rust_decimal::Decimal;
///
/// let mut carousel = ProductCarousel::new();
/// carousel.add_end(Product::new("P1", "Lamp", Decimal::ONE, false)).unwrap();
/// carousel.add_end(Product::new("P2", "Mug", Decimal::ONE, true)).unwrap();
///
/// // The featured mug is pulled into the first slot
/// assert_eq!(carousel.ids(), vec!["P2", "P1"]);
/// ```
#[derive(Debug)]
pub struct ProductCarousel {
    /// Node storage; links are keys into this slab
    nodes: Slab<ProductNode>,

    /// First node (slot 0)
    head: Option<usize>,

    /// Last node
    tail: Option<usize>,

    /// Number of front slots reserved for featured products
    featured_window: usize,

    events: EventBuffer,
}

impl Default for ProductCarousel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductCarousel {
    /// Create an empty carousel with the default 3-slot featured window
    pub fn new() -> Self {
        Self::with_featured_window(DEFAULT_FEATURED_WINDOW)
    }

    pub fn with_featured_window(featured_window: usize) -> Self {
        Self {
            nodes: Slab::new(),
            head: None,
            tail: None,
            featured_window,
            events: EventBuffer::new(),
        }
    }

    // ========================================================================
    // Size and Lookup
    // ========================================================================

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn featured_window(&self) -> usize {
        self.featured_window
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.find(product_id).is_some()
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.find(product_id).map(|key| &self.nodes[key].product)
    }

    pub fn head_id(&self) -> Option<&str> {
        self.head.map(|key| self.nodes[key].product_id())
    }

    pub fn tail_id(&self) -> Option<&str> {
        self.tail.map(|key| self.nodes[key].product_id())
    }

    /// Products from head to tail
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
            remaining: self.nodes.len(),
        }
    }

    /// Product ids from head to tail
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|product| product.id.as_str()).collect()
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.events.drain()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Insert a product at slot 0, then run the placement pass.
    ///
    /// # Errors
    ///
    /// `DuplicateProduct` if a product with the same id is listed.
    pub fn add_front(&mut self, product: Product) -> Result<()> {
        let key = self.insert_node(product, Placement::Front)?;
        self.link_front(key);
        self.place_featured();
        Ok(())
    }

    /// Append a product at the tail, then run the placement pass.
    ///
    /// # Errors
    ///
    /// `DuplicateProduct` if a product with the same id is listed.
    pub fn add_end(&mut self, product: Product) -> Result<()> {
        let key = self.insert_node(product, Placement::End)?;
        self.link_back(key);
        self.place_featured();
        Ok(())
    }

    /// Remove a product by id and return it.
    ///
    /// The lookup is a bounded scan from the head; an absent id yields
    /// `ProductNotFound` rather than walking past the tail.
    pub fn remove(&mut self, product_id: &str) -> Result<Product> {
        let key = self
            .find(product_id)
            .ok_or_else(|| StoreError::ProductNotFound(product_id.to_string()))?;

        self.unlink(key);
        let node = self.nodes.remove(key);

        tracing::debug!(product_id, "product removed from carousel");
        self.events.push(StoreEvent::ProductRemoved {
            product_id: product_id.to_string(),
        });

        self.place_featured();
        Ok(node.product)
    }

    /// Relink a product at slot 0, then run the placement pass.
    ///
    /// A non-featured product moved to the front ends up directly behind
    /// the featured products occupying the window.
    pub fn move_to_front(&mut self, product_id: &str) -> Result<()> {
        let key = self
            .find(product_id)
            .ok_or_else(|| StoreError::ProductNotFound(product_id.to_string()))?;

        if self.head != Some(key) {
            self.unlink(key);
            self.link_front(key);
        }

        tracing::debug!(product_id, "product moved to front");
        self.events.push(StoreEvent::ProductMovedToFront {
            product_id: product_id.to_string(),
        });

        self.place_featured();
        Ok(())
    }

    /// Detect and repair a cycle in the forward links.
    ///
    /// Returns [`Validation::Repaired`] when a cycle was cut. Products left
    /// unreachable by the corrupted link are released and listed in
    /// [`CycleRepair::dropped`]; they cannot be recovered.
    pub fn validate(&mut self) -> Validation {
        let Some((cycle_start, predecessor)) = self.locate_cycle() else {
            return Validation::NoCycle;
        };

        self.nodes[predecessor].next = None;
        let dropped = self.relink_from_head();

        let repair = CycleRepair {
            cycle_start: self.nodes[cycle_start].product.id.clone(),
            dropped,
        };

        tracing::warn!(
            cycle_start = %repair.cycle_start,
            dropped = repair.dropped.len(),
            "carousel cycle detected and cut"
        );
        self.events.push(StoreEvent::CycleRepaired {
            cycle_start: repair.cycle_start.clone(),
            dropped: repair.dropped.clone(),
        });

        Validation::Repaired(repair)
    }

    // ========================================================================
    // Featured Placement
    // ========================================================================

    /// Pull featured products into the front window.
    ///
    /// Each relink fills one more window slot with a featured product, so
    /// the pass performs at most `featured_window` relinks.
    fn place_featured(&mut self) {
        let mut cursor = self.head;
        let mut slot = 0;

        while slot < self.featured_window {
            let Some(key) = cursor else { break };

            if !self.nodes[key].is_featured() {
                let Some(found) = self.next_featured_after(key) else {
                    break;
                };

                self.unlink(found);
                self.link_before(found, key);

                let product_id = self.nodes[found].product.id.clone();
                tracing::debug!(%product_id, slot, "featured product placed");
                self.events.push(StoreEvent::FeaturedPlaced { product_id, slot });

                // Re-examine this slot, now holding the featured node
                cursor = Some(found);
                continue;
            }

            cursor = self.nodes[key].next;
            slot += 1;
        }
    }

    /// Nearest featured node after `key`, scanning at most `len` links
    fn next_featured_after(&self, key: usize) -> Option<usize> {
        let mut cursor = self.next_of(key);
        for _ in 0..self.nodes.len() {
            let candidate = cursor?;
            let node = self.nodes.get(candidate)?;
            if node.is_featured() {
                return Some(candidate);
            }
            cursor = node.next;
        }
        None
    }

    // ========================================================================
    // Cycle Detection
    // ========================================================================

    /// Find the first node on a forward cycle and its predecessor on it.
    fn locate_cycle(&self) -> Option<(usize, usize)> {
        let head = self.head?;

        // Tortoise and hare; the hare hitting `None` means no cycle
        let (mut slow, mut fast) = (head, head);
        loop {
            slow = self.next_of(slow)?;
            fast = self.next_of(self.next_of(fast)?)?;
            if slow == fast {
                break;
            }
        }
        let meeting = slow;

        // Head and meeting point are equally far from the cycle start
        let (mut start, mut cursor) = (head, meeting);
        while start != cursor {
            start = self.next_of(start)?;
            cursor = self.next_of(cursor)?;
        }

        let mut predecessor = meeting;
        while self.next_of(predecessor)? != start {
            predecessor = self.next_of(predecessor)?;
        }

        Some((start, predecessor))
    }

    /// Rebuild back links and the tail from the head, releasing every node
    /// the walk does not reach. Returns the released product ids.
    fn relink_from_head(&mut self) -> Vec<String> {
        let mut reachable = FxHashSet::default();
        let mut prev = None;
        let mut cursor = self.head;

        while let Some(key) = cursor {
            reachable.insert(key);
            let node = &mut self.nodes[key];
            node.prev = prev;
            prev = Some(key);
            cursor = node.next;
        }
        self.tail = prev;

        let orphans: Vec<usize> = self
            .nodes
            .iter()
            .map(|(key, _)| key)
            .filter(|key| !reachable.contains(key))
            .collect();

        orphans
            .into_iter()
            .map(|key| self.nodes.remove(key).product.id)
            .collect()
    }

    // ========================================================================
    // Link Surgery
    // ========================================================================

    fn insert_node(&mut self, product: Product, placement: Placement) -> Result<usize> {
        if self.contains(&product.id) {
            return Err(StoreError::DuplicateProduct(product.id));
        }

        let product_id = product.id.clone();
        let key = self.nodes.insert(ProductNode::new(product));

        tracing::debug!(%product_id, ?placement, "product added to carousel");
        self.events.push(StoreEvent::ProductAdded {
            product_id,
            placement,
        });
        Ok(key)
    }

    /// Bounded scan from the head
    fn find(&self, product_id: &str) -> Option<usize> {
        let mut cursor = self.head;
        for _ in 0..self.nodes.len() {
            let key = cursor?;
            let node = self.nodes.get(key)?;
            if node.product_id() == product_id {
                return Some(key);
            }
            cursor = node.next;
        }
        None
    }

    #[inline]
    fn next_of(&self, key: usize) -> Option<usize> {
        self.nodes.get(key)?.next
    }

    fn link_front(&mut self, key: usize) {
        let old_head = self.head;
        let node = &mut self.nodes[key];
        node.prev = None;
        node.next = old_head;

        match old_head {
            Some(head_key) => self.nodes[head_key].prev = Some(key),
            None => self.tail = Some(key),
        }
        self.head = Some(key);
    }

    fn link_back(&mut self, key: usize) {
        let old_tail = self.tail;
        let node = &mut self.nodes[key];
        node.prev = old_tail;
        node.next = None;

        match old_tail {
            Some(tail_key) => self.nodes[tail_key].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
    }

    /// Link the unlinked node `key` directly in front of `anchor`
    fn link_before(&mut self, key: usize, anchor: usize) {
        let anchor_prev = self.nodes[anchor].prev;

        let node = &mut self.nodes[key];
        node.prev = anchor_prev;
        node.next = Some(anchor);
        self.nodes[anchor].prev = Some(key);

        match anchor_prev {
            Some(prev_key) => self.nodes[prev_key].next = Some(key),
            None => self.head = Some(key),
        }
    }

    fn unlink(&mut self, key: usize) {
        let node = &self.nodes[key];
        let prev_key = node.prev;
        let next_key = node.next;

        match prev_key {
            Some(prev) => self.nodes[prev].next = next_key,
            None => self.head = next_key,
        }

        match next_key {
            Some(next) => self.nodes[next].prev = prev_key,
            None => self.tail = prev_key,
        }

        let node = &mut self.nodes[key];
        node.prev = None;
        node.next = None;
    }

    /// Point `from`'s forward link at `to`, bypassing every invariant.
    #[cfg(test)]
    pub(crate) fn corrupt_next(&mut self, from: &str, to: &str) {
        let from = self.find(from).expect("corrupt_next: unknown source");
        let to = self.find(to).expect("corrupt_next: unknown target");
        self.nodes[from].next = Some(to);
    }
}

/// Iterator over carousel products from head to tail.
pub struct Iter<'a> {
    nodes: &'a Slab<ProductNode>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Product;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.cursor?)?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.product)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
