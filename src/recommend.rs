//! Product co-purchase graph.
//!
//! Undirected adjacency sets keyed by product id. Ordered maps keep
//! recommendation output deterministic (ascending product id); there is no
//! ranking.

use std::collections::{BTreeMap, BTreeSet};

use crate::events::{EventBuffer, StoreEvent};

#[derive(Debug, Default)]
pub struct RecommendationGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
    events: EventBuffer,
}

impl RecommendationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relate two products in both directions.
    ///
    /// Returns `false` if the relation already existed or `a == b`.
    pub fn add_relation(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }

        let inserted = self
            .adjacency
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());

        if inserted {
            tracing::debug!(a, b, "relation added");
            self.events.push(StoreEvent::RelationAdded {
                a: a.to_string(),
                b: b.to_string(),
            });
        }
        inserted
    }

    /// Up to `k` related products, empty for an unknown id
    pub fn recommend(&self, product_id: &str, k: usize) -> Vec<String> {
        self.neighbours(product_id)
            .map(|set| set.iter().take(k).cloned().collect())
            .unwrap_or_default()
    }

    pub fn neighbours(&self, product_id: &str) -> Option<&BTreeSet<String>> {
        self.adjacency.get(product_id)
    }

    /// Number of products with at least one relation
    pub fn product_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Every product with its related products
    pub fn relations(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> + '_ {
        self.adjacency.iter().map(|(id, set)| (id.as_str(), set))
    }

    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.events.drain()
    }
}
