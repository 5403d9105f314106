//! Order queue with a one-step VIP jump.
//!
//! ## Insertion Rule
//!
//! ```text
//! empty queue            [] + A          -> [A]
//! regular order          [A, B] + C      -> [A, B, C]
//! VIP, one queued        [A] + V         -> [V, A]
//! VIP, two or more       [A, B, C] + V   -> [A, B, V, C]
//! ```
//!
//! A VIP order lands directly in front of the current rear, however many
//! orders or VIPs are already queued. It never moves further forward.
//! Dequeue always takes the front.

use slab::Slab;

use crate::events::{EventBuffer, StoreEvent};
use crate::types::Order;

#[derive(Debug)]
struct QueueNode {
    order: Order,
    next: Option<usize>,
    prev: Option<usize>,
}

/// FIFO of submitted orders.
///
/// ## Example
///
/// ```
/// use brightcart::orders::OrderQueue;
/// use brightcart::types::Order;
///
/// let mut queue = OrderQueue::new();
/// queue.enqueue(Order::new("A", vec![], false));
/// queue.enqueue(Order::new("B", vec![], false));
/// queue.enqueue(Order::new("C", vec![], true));
///
/// assert_eq!(queue.ids(), vec!["A", "C", "B"]);
/// ```
#[derive(Debug, Default)]
pub struct OrderQueue {
    nodes: Slab<QueueNode>,
    front: Option<usize>,
    rear: Option<usize>,
    events: EventBuffer,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Queue an order and return its 0-based position from the front
    pub fn enqueue(&mut self, order: Order) -> usize {
        let order_id = order.id.clone();
        let vip = order.vip;
        let key = self.nodes.insert(QueueNode {
            order,
            next: None,
            prev: None,
        });

        let position = match self.rear {
            // VIP with at least one queued order: in front of the rear.
            // With a single queued order that makes it the new front.
            Some(rear) if vip => {
                self.link_before(key, rear);
                self.nodes.len() - 2
            }
            _ => {
                self.link_back(key);
                self.nodes.len() - 1
            }
        };

        tracing::info!(%order_id, vip, position, "order enqueued");
        self.events.push(StoreEvent::OrderEnqueued {
            order_id,
            vip,
            position,
        });
        position
    }

    /// Remove and return the front order
    pub fn dequeue(&mut self) -> Option<Order> {
        let key = self.front?;
        let next = self.nodes[key].next;

        self.front = next;
        match next {
            Some(next_key) => self.nodes[next_key].prev = None,
            None => self.rear = None,
        }

        let order = self.nodes.remove(key).order;
        tracing::info!(order_id = %order.id, "order dequeued");
        self.events.push(StoreEvent::OrderDequeued {
            order_id: order.id.clone(),
        });
        Some(order)
    }

    pub fn peek(&self) -> Option<&Order> {
        self.front.map(|key| &self.nodes[key].order)
    }

    /// Orders from front to rear
    pub fn iter(&self) -> impl Iterator<Item = &Order> + '_ {
        let mut cursor = self.front;
        std::iter::from_fn(move || {
            let node = &self.nodes[cursor?];
            cursor = node.next;
            Some(&node.order)
        })
    }

    /// Order ids from front to rear
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|order| order.id.as_str()).collect()
    }

    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.events.drain()
    }

    fn link_back(&mut self, key: usize) {
        let old_rear = self.rear;
        self.nodes[key].prev = old_rear;

        match old_rear {
            Some(rear_key) => self.nodes[rear_key].next = Some(key),
            None => self.front = Some(key),
        }
        self.rear = Some(key);
    }

    fn link_before(&mut self, key: usize, anchor: usize) {
        let anchor_prev = self.nodes[anchor].prev;

        let node = &mut self.nodes[key];
        node.prev = anchor_prev;
        node.next = Some(anchor);
        self.nodes[anchor].prev = Some(key);

        match anchor_prev {
            Some(prev_key) => self.nodes[prev_key].next = Some(key),
            None => self.front = Some(key),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, vip: bool) -> Order {
        Order::new(id, vec![format!("item-{id}")], vip)
    }

    fn drain_ids(queue: &mut OrderQueue) -> Vec<String> {
        std::iter::from_fn(|| queue.dequeue()).map(|o| o.id).collect()
    }

    #[test]
    fn test_queue_new() {
        let mut queue = OrderQueue::new();

        assert!(queue.is_empty());
        assert!(queue.peek().is_none());
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_regular_orders_fifo() {
        let mut queue = OrderQueue::new();
        assert_eq!(queue.enqueue(order("A", false)), 0);
        assert_eq!(queue.enqueue(order("B", false)), 1);
        assert_eq!(queue.enqueue(order("C", false)), 2);

        assert_eq!(queue.peek().map(|o| o.id.as_str()), Some("A"));
        assert_eq!(drain_ids(&mut queue), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_vip_on_empty_queue() {
        let mut queue = OrderQueue::new();
        assert_eq!(queue.enqueue(order("V", true)), 0);
        assert_eq!(queue.ids(), vec!["V"]);
    }

    #[test]
    fn test_vip_with_one_queued_becomes_front() {
        let mut queue = OrderQueue::new();
        queue.enqueue(order("A", false));
        assert_eq!(queue.enqueue(order("B", true)), 0);

        assert_eq!(queue.ids(), vec!["B", "A"]);
        assert_eq!(drain_ids(&mut queue), vec!["B", "A"]);
    }

    #[test]
    fn test_vip_with_two_queued_jumps_one() {
        let mut queue = OrderQueue::new();
        queue.enqueue(order("A", false));
        queue.enqueue(order("B", false));
        assert_eq!(queue.enqueue(order("C", true)), 1);

        assert_eq!(queue.ids(), vec!["A", "C", "B"]);
        assert_eq!(drain_ids(&mut queue), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_consecutive_vips_only_pass_the_rear() {
        let mut queue = OrderQueue::new();
        for id in ["A", "B", "C"] {
            queue.enqueue(order(id, false));
        }
        queue.enqueue(order("V1", true));
        queue.enqueue(order("V2", true));

        // V2 jumps only the rear (C), not V1
        assert_eq!(queue.ids(), vec!["A", "B", "V1", "V2", "C"]);
    }

    #[test]
    fn test_regular_after_vip_goes_to_rear() {
        let mut queue = OrderQueue::new();
        queue.enqueue(order("A", false));
        queue.enqueue(order("V", true));
        queue.enqueue(order("B", false));

        assert_eq!(queue.ids(), vec!["V", "A", "B"]);
    }

    #[test]
    fn test_dequeue_to_empty_then_reuse() {
        let mut queue = OrderQueue::new();
        queue.enqueue(order("A", false));
        queue.dequeue();
        assert!(queue.is_empty());

        queue.enqueue(order("B", false));
        queue.enqueue(order("V", true));
        assert_eq!(queue.ids(), vec!["V", "B"]);
    }

    #[test]
    fn test_events() {
        let mut queue = OrderQueue::new();
        queue.enqueue(order("A", false));
        queue.enqueue(order("V", true));
        queue.dequeue();

        assert_eq!(
            queue.drain_events(),
            vec![
                StoreEvent::OrderEnqueued {
                    order_id: "A".into(),
                    vip: false,
                    position: 0,
                },
                StoreEvent::OrderEnqueued {
                    order_id: "V".into(),
                    vip: true,
                    position: 0,
                },
                StoreEvent::OrderDequeued {
                    order_id: "V".into(),
                },
            ]
        );
    }
}
