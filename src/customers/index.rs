//! Binary search tree of customers keyed by id.
//!
//! Nodes live in a slab; `left`/`right` are slab keys. Lookups descend from
//! the root iteratively. Deletion of a node with two children copies the
//! in-order successor's customer into the node's slot and then deletes the
//! successor from the right subtree.

use slab::Slab;

use crate::customers::promote::{PromotionPolicy, PromotionStrategy};
use crate::error::{Result, StoreError};
use crate::events::{EventBuffer, StoreEvent};
use crate::types::Customer;

/// Tree node: a customer and its child links.
#[derive(Debug)]
pub(crate) struct CustomerNode {
    pub(crate) customer: Customer,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl CustomerNode {
    fn new(customer: Customer) -> Self {
        Self {
            customer,
            left: None,
            right: None,
        }
    }
}

/// Result of a successful [`CustomerIndex::promote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// The customer moved up; depths count edges from the root
    Promoted { from_depth: usize, to_depth: usize },
    /// The customer is already the root
    AlreadyRoot,
}

/// Customer lookup tree with a pluggable promotion strategy.
///
/// ## Example
///
/// ```
/// use brightcart::customers::{CustomerIndex, PromotionOutcome};
/// use brightcart::types::Customer;
///
/// let mut index = CustomerIndex::new();
/// for id in [50, 30, 70, 20, 40] {
///     index.insert(Customer::new(id, "", "")).unwrap();
/// }
///
/// let outcome = index.promote(40).unwrap();
/// assert_eq!(outcome, PromotionOutcome::Promoted { from_depth: 2, to_depth: 0 });
/// assert_eq!(index.in_order(), vec![20, 30, 40, 50, 70]);
/// ```
#[derive(Debug)]
pub struct CustomerIndex {
    nodes: Slab<CustomerNode>,
    root: Option<usize>,
    strategy: Box<dyn PromotionStrategy>,
    events: EventBuffer,
}

impl Default for CustomerIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerIndex {
    /// Create an empty index using the order-preserving rotation
    pub fn new() -> Self {
        Self::with_policy(PromotionPolicy::default())
    }

    pub fn with_policy(policy: PromotionPolicy) -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
            strategy: policy.strategy(),
            events: EventBuffer::new(),
        }
    }

    pub fn policy(&self) -> PromotionPolicy {
        self.strategy.policy()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_id(&self) -> Option<u64> {
        self.root.map(|key| self.nodes[key].customer.id)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn find(&self, id: u64) -> Option<&Customer> {
        self.locate(id).map(|(key, _)| &self.nodes[key].customer)
    }

    pub fn find_mut(&mut self, id: u64) -> Option<&mut Customer> {
        let (key, _) = self.locate(id)?;
        Some(&mut self.nodes[key].customer)
    }

    #[inline]
    pub fn contains(&self, id: u64) -> bool {
        self.locate(id).is_some()
    }

    /// Number of edges between the root and `id`
    pub fn depth_of(&self, id: u64) -> Option<usize> {
        self.locate(id).map(|(_, depth)| depth)
    }

    /// Slab key and depth of `id`, by key-ordered descent
    fn locate(&self, id: u64) -> Option<(usize, usize)> {
        let mut cursor = self.root;
        let mut depth = 0;

        while let Some(key) = cursor {
            let node = &self.nodes[key];
            if node.customer.id == id {
                return Some((key, depth));
            }
            cursor = if id < node.customer.id {
                node.left
            } else {
                node.right
            };
            depth += 1;
        }
        None
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a new customer at its ordered leaf position.
    ///
    /// # Errors
    ///
    /// `DuplicateCustomer` if the id is already indexed.
    pub fn insert(&mut self, customer: Customer) -> Result<()> {
        let id = customer.id;

        let mut parent = None;
        let mut cursor = self.root;
        while let Some(key) = cursor {
            let node_id = self.nodes[key].customer.id;
            if node_id == id {
                return Err(StoreError::DuplicateCustomer(id));
            }
            parent = Some(key);
            cursor = if id < node_id {
                self.nodes[key].left
            } else {
                self.nodes[key].right
            };
        }

        let key = self.nodes.insert(CustomerNode::new(customer));
        match parent {
            None => self.root = Some(key),
            Some(p) if id < self.nodes[p].customer.id => self.nodes[p].left = Some(key),
            Some(p) => self.nodes[p].right = Some(key),
        }

        tracing::debug!(customer_id = id, "customer added");
        self.events.push(StoreEvent::CustomerAdded { customer_id: id });
        Ok(())
    }

    /// Remove a customer and return its record.
    ///
    /// # Errors
    ///
    /// `CustomerNotFound` if no customer has this id.
    pub fn delete(&mut self, id: u64) -> Result<Customer> {
        let root = self.root;
        let (root, removed) = self.delete_in(root, id);
        let customer = removed.ok_or(StoreError::CustomerNotFound(id))?;
        self.root = root;

        tracing::debug!(customer_id = id, "customer removed");
        self.events.push(StoreEvent::CustomerRemoved { customer_id: id });
        Ok(customer)
    }

    /// Delete `id` from the subtree at `key`.
    ///
    /// Returns the subtree's new root and the removed customer.
    fn delete_in(&mut self, key: Option<usize>, id: u64) -> (Option<usize>, Option<Customer>) {
        let Some(key) = key else {
            return (None, None);
        };
        let node_id = self.nodes[key].customer.id;

        if id < node_id {
            let left = self.nodes[key].left;
            let (left, removed) = self.delete_in(left, id);
            self.nodes[key].left = left;
            return (Some(key), removed);
        }
        if id > node_id {
            let right = self.nodes[key].right;
            let (right, removed) = self.delete_in(right, id);
            self.nodes[key].right = right;
            return (Some(key), removed);
        }

        let (left, right) = (self.nodes[key].left, self.nodes[key].right);
        match (left, right) {
            (None, child) | (child, None) => {
                let node = self.nodes.remove(key);
                (child, Some(node.customer))
            }
            (Some(_), Some(right)) => {
                let successor_id = self.nodes[self.min_key(right)].customer.id;
                let (new_right, successor) = self.delete_in(Some(right), successor_id);
                self.nodes[key].right = new_right;

                let removed = successor
                    .map(|successor| std::mem::replace(&mut self.nodes[key].customer, successor));
                (Some(key), removed)
            }
        }
    }

    fn min_key(&self, mut key: usize) -> usize {
        while let Some(left) = self.nodes[key].left {
            key = left;
        }
        key
    }

    /// Move a customer toward the root using the configured policy.
    ///
    /// # Errors
    ///
    /// `CustomerNotFound` if no customer has this id.
    pub fn promote(&mut self, id: u64) -> Result<PromotionOutcome> {
        let (_, from_depth) = self.locate(id).ok_or(StoreError::CustomerNotFound(id))?;
        if from_depth == 0 {
            return Ok(PromotionOutcome::AlreadyRoot);
        }

        if !self.strategy.promote(&mut self.nodes, &mut self.root, id) {
            return Err(StoreError::CustomerNotFound(id));
        }
        let to_depth = self
            .depth_of(id)
            .ok_or(StoreError::InvalidState("promoted customer unreachable"))?;

        tracing::info!(
            customer_id = id,
            policy = %self.policy(),
            from_depth,
            to_depth,
            "customer promoted"
        );
        self.events.push(StoreEvent::CustomerPromoted {
            customer_id: id,
            from_depth,
            to_depth,
        });
        Ok(PromotionOutcome::Promoted {
            from_depth,
            to_depth,
        })
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Ids in in-order (left, node, right) sequence.
    pub fn in_order(&self) -> Vec<u64> {
        let mut ids = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;

        while cursor.is_some() || !stack.is_empty() {
            while let Some(key) = cursor {
                stack.push(key);
                cursor = self.nodes[key].left;
            }
            let Some(key) = stack.pop() else {
                break;
            };
            ids.push(self.nodes[key].customer.id);
            cursor = self.nodes[key].right;
        }
        ids
    }

    /// `true` if the in-order sequence is strictly increasing
    pub fn is_valid_bst(&self) -> bool {
        self.in_order().windows(2).all(|pair| pair[0] < pair[1])
    }

    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.events.drain()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(policy: PromotionPolicy, ids: &[u64]) -> CustomerIndex {
        let mut index = CustomerIndex::with_policy(policy);
        for &id in ids {
            index
                .insert(Customer::new(id, format!("c{id}"), format!("c{id}@example.com")))
                .unwrap();
        }
        index
    }

    const SAMPLE: [u64; 5] = [50, 30, 70, 20, 40];

    #[test]
    fn test_insert_and_find() {
        let index = index_with(PromotionPolicy::Rotate, &SAMPLE);

        assert_eq!(index.len(), 5);
        assert_eq!(index.root_id(), Some(50));
        assert_eq!(index.find(40).map(|c| c.name.as_str()), Some("c40"));
        assert!(index.find(99).is_none());
        assert_eq!(index.depth_of(40), Some(2));
        assert_eq!(index.in_order(), vec![20, 30, 40, 50, 70]);
    }

    #[test]
    fn test_duplicate_insert() {
        let mut index = index_with(PromotionPolicy::Rotate, &SAMPLE);
        assert_eq!(
            index.insert(Customer::new(30, "x", "y")),
            Err(StoreError::DuplicateCustomer(30))
        );
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_find_mut_records_purchase() {
        let mut index = index_with(PromotionPolicy::Rotate, &SAMPLE);
        index.find_mut(20).unwrap().record_purchase();

        assert_eq!(index.find(20).unwrap().purchase_count, 1);
    }

    #[test]
    fn test_delete_leaf_and_single_child() {
        let mut index = index_with(PromotionPolicy::Rotate, &[50, 30, 70, 20]);

        assert_eq!(index.delete(20).unwrap().id, 20);
        assert_eq!(index.in_order(), vec![30, 50, 70]);

        index.insert(Customer::new(80, "", "")).unwrap();
        index.delete(70).unwrap();
        assert_eq!(index.in_order(), vec![30, 50, 80]);
        assert_eq!(index.depth_of(80), Some(1));
    }

    #[test]
    fn test_delete_two_children_uses_successor() {
        let mut index = index_with(PromotionPolicy::Rotate, &[50, 30, 70, 20, 40, 60, 80, 65]);

        let removed = index.delete(50).unwrap();
        assert_eq!(removed.id, 50);
        assert_eq!(removed.name, "c50");

        // 60 takes the root slot, its right child 65 moves up
        assert_eq!(index.root_id(), Some(60));
        assert_eq!(index.find(60).unwrap().name, "c60");
        assert_eq!(index.in_order(), vec![20, 30, 40, 60, 65, 70, 80]);
        assert!(index.is_valid_bst());
        assert_eq!(index.len(), 7);
    }

    #[test]
    fn test_delete_missing() {
        let mut index = index_with(PromotionPolicy::Rotate, &SAMPLE);
        assert_eq!(index.delete(99), Err(StoreError::CustomerNotFound(99)));
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_delete_until_empty() {
        let mut index = index_with(PromotionPolicy::Rotate, &SAMPLE);
        for id in SAMPLE {
            index.delete(id).unwrap();
        }
        assert!(index.is_empty());
        assert_eq!(index.root_id(), None);
    }

    #[test]
    fn test_rotate_promote_preserves_order() {
        let mut index = index_with(PromotionPolicy::Rotate, &SAMPLE);

        assert_eq!(
            index.promote(40),
            Ok(PromotionOutcome::Promoted {
                from_depth: 2,
                to_depth: 0
            })
        );
        assert_eq!(index.in_order(), vec![20, 30, 40, 50, 70]);
        assert_eq!(index.root_id(), Some(40));
        assert!(index.is_valid_bst());
    }

    #[test]
    fn test_rotate_promote_left_child() {
        let mut index = index_with(PromotionPolicy::Rotate, &SAMPLE);
        index.promote(30).unwrap();

        assert_eq!(index.root_id(), Some(30));
        assert_eq!(index.depth_of(50), Some(1));
        assert_eq!(index.depth_of(40), Some(2));
        assert!(index.is_valid_bst());
    }

    #[test]
    fn test_splice_promote_one_level() {
        let mut index = index_with(PromotionPolicy::Splice, &SAMPLE);

        assert_eq!(
            index.promote(40),
            Ok(PromotionOutcome::Promoted {
                from_depth: 2,
                to_depth: 1
            })
        );
        // 30 becomes the left child of 40, keeping 20 below it
        assert_eq!(index.root_id(), Some(50));
        assert_eq!(index.depth_of(30), Some(2));
        assert_eq!(index.depth_of(20), Some(3));
        assert_eq!(index.in_order(), vec![20, 30, 40, 50, 70]);
        assert!(index.is_valid_bst());
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_splice_promote_left_child_of_root() {
        let mut index = index_with(PromotionPolicy::Splice, &SAMPLE);
        index.promote(30).unwrap();

        // 40 moves across to become the left child of 50
        assert_eq!(index.root_id(), Some(30));
        assert_eq!(index.depth_of(50), Some(1));
        assert_eq!(index.depth_of(40), Some(2));
        assert_eq!(index.in_order(), vec![20, 30, 40, 50, 70]);
        assert!(index.is_valid_bst());
        for id in SAMPLE {
            assert!(index.contains(id));
        }
    }

    #[test]
    fn test_splice_promote_right_child_of_root() {
        let mut index = index_with(PromotionPolicy::Splice, &SAMPLE);
        index.promote(70).unwrap();

        assert_eq!(index.root_id(), Some(70));
        assert_eq!(index.depth_of(50), Some(1));
        assert_eq!(index.in_order(), vec![20, 30, 40, 50, 70]);
        assert!(index.is_valid_bst());
    }

    #[test]
    fn test_promote_root_and_missing() {
        for policy in [PromotionPolicy::Rotate, PromotionPolicy::Splice] {
            let mut index = index_with(policy, &SAMPLE);

            assert_eq!(index.promote(50), Ok(PromotionOutcome::AlreadyRoot));
            assert_eq!(index.promote(99), Err(StoreError::CustomerNotFound(99)));
            assert_eq!(index.root_id(), Some(50));
        }
    }

    #[test]
    fn test_events() {
        let mut index = index_with(PromotionPolicy::Rotate, &[2, 1]);
        index.promote(1).unwrap();
        index.promote(1).unwrap();
        index.delete(2).unwrap();

        assert_eq!(
            index.drain_events(),
            vec![
                StoreEvent::CustomerAdded { customer_id: 2 },
                StoreEvent::CustomerAdded { customer_id: 1 },
                StoreEvent::CustomerPromoted {
                    customer_id: 1,
                    from_depth: 1,
                    to_depth: 0,
                },
                StoreEvent::CustomerRemoved { customer_id: 2 },
            ]
        );
    }
}
