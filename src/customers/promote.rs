//! Promotion strategies for the customer index.
//!
//! ## Rotate (default)
//!
//! A recursive search for the target; whenever the recursive call returns
//! the target as the new child, the current node is rotated so the target
//! takes its place. The target climbs all the way to the root and ordering
//! is preserved.
//!
//! ```text
//!        50                 40
//!       /  \               /  \
//!     30    70    ->     30    50
//!    /  \               /        \
//!  20    40           20          70
//! ```
//!
//! ## Splice (compatibility)
//!
//! The target moves exactly one level up. It takes its parent's slot, the
//! parent becomes the target's child on the opposite side, and the parent's
//! vacated link adopts the target's inner child. This is a single rotation,
//! so ordering is preserved and key lookups keep working.
//!
//! ```text
//!        50                 50
//!       /  \               /  \
//!     30    70    ->     40    70
//!    /  \               /
//!  20    40           30
//!                    /
//!                  20
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slab::Slab;

use crate::customers::index::CustomerNode;

/// Which promotion strategy a [`CustomerIndex`](crate::customers::CustomerIndex) uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPolicy {
    /// Rotate the target up to the root, preserving key order
    #[default]
    Rotate,
    /// Lift the target one level by rotating it over its parent
    Splice,
}

impl PromotionPolicy {
    pub(crate) fn strategy(self) -> Box<dyn PromotionStrategy> {
        match self {
            Self::Rotate => Box::new(RotateToRoot),
            Self::Splice => Box::new(DirectSplice),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rotate => "rotate",
            Self::Splice => "splice",
        }
    }
}

impl fmt::Display for PromotionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown promotion policy `{0}`")]
pub struct UnknownPolicy(pub String);

impl FromStr for PromotionPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rotate" => Ok(Self::Rotate),
            "splice" => Ok(Self::Splice),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

/// Moves a non-root node closer to the root.
///
/// The index has already checked that `id` exists and is not the root.
/// Returns `false` if the strategy could not reach the node.
pub(crate) trait PromotionStrategy: Send + fmt::Debug {
    fn policy(&self) -> PromotionPolicy;

    fn promote(&self, nodes: &mut Slab<CustomerNode>, root: &mut Option<usize>, id: u64) -> bool;
}

// ============================================================================
// Rotate
// ============================================================================

#[derive(Debug)]
pub(crate) struct RotateToRoot;

impl PromotionStrategy for RotateToRoot {
    fn policy(&self) -> PromotionPolicy {
        PromotionPolicy::Rotate
    }

    fn promote(&self, nodes: &mut Slab<CustomerNode>, root: &mut Option<usize>, id: u64) -> bool {
        let Some(root_key) = *root else {
            return false;
        };
        match rotate_up(nodes, root_key, id) {
            Some(new_root) => {
                *root = Some(new_root);
                true
            }
            None => false,
        }
    }
}

/// Promote `id` within the subtree at `key`, returning the subtree's new
/// root, or `None` if `id` is not in the subtree.
fn rotate_up(nodes: &mut Slab<CustomerNode>, key: usize, id: u64) -> Option<usize> {
    let node_id = nodes[key].customer.id;
    if id == node_id {
        return Some(key);
    }

    if id < node_id {
        let left = nodes[key].left?;
        let child = rotate_up(nodes, left, id)?;
        nodes[key].left = Some(child);
        if nodes[child].customer.id == id {
            return Some(rotate_right(nodes, key, child));
        }
    } else {
        let right = nodes[key].right?;
        let child = rotate_up(nodes, right, id)?;
        nodes[key].right = Some(child);
        if nodes[child].customer.id == id {
            return Some(rotate_left(nodes, key, child));
        }
    }
    Some(key)
}

/// `pivot` is the left child of `key`; it becomes the subtree root
fn rotate_right(nodes: &mut Slab<CustomerNode>, key: usize, pivot: usize) -> usize {
    nodes[key].left = nodes[pivot].right;
    nodes[pivot].right = Some(key);
    pivot
}

/// `pivot` is the right child of `key`; it becomes the subtree root
fn rotate_left(nodes: &mut Slab<CustomerNode>, key: usize, pivot: usize) -> usize {
    nodes[key].right = nodes[pivot].left;
    nodes[pivot].left = Some(key);
    pivot
}

// ============================================================================
// Splice
// ============================================================================

#[derive(Debug)]
pub(crate) struct DirectSplice;

impl PromotionStrategy for DirectSplice {
    fn policy(&self) -> PromotionPolicy {
        PromotionPolicy::Splice
    }

    fn promote(&self, nodes: &mut Slab<CustomerNode>, root: &mut Option<usize>, id: u64) -> bool {
        let mut grandparent = None;
        let mut parent = None;
        let mut cursor = *root;

        while let Some(key) = cursor {
            let node_id = nodes[key].customer.id;
            if node_id == id {
                break;
            }
            grandparent = parent;
            parent = Some(key);
            cursor = if id < node_id {
                nodes[key].left
            } else {
                nodes[key].right
            };
        }

        let (Some(target), Some(parent)) = (cursor, parent) else {
            return false;
        };

        if nodes[parent].left == Some(target) {
            rotate_right(nodes, parent, target);
        } else {
            rotate_left(nodes, parent, target);
        }

        match grandparent {
            None => *root = Some(target),
            Some(g) if nodes[g].left == Some(parent) => nodes[g].left = Some(target),
            Some(g) => nodes[g].right = Some(target),
        }
        true
    }
}
