//! Structured events emitted by store mutations.
//!
//! Components never print. Every mutation pushes a [`StoreEvent`] into the
//! component's [`EventBuffer`]; whoever drives the component drains the
//! buffer and forwards events to observers. The
//! [`Storefront`](crate::Storefront) facade does this after every command.
//!
//! Buffers are bounded. A component driven directly and never drained keeps
//! only its most recent [`EVENT_BUFFER_LIMIT`] events; older ones are
//! discarded and counted in [`EventBuffer::dropped`].

use std::collections::VecDeque;

use serde::Serialize;

use crate::types::CartAction;

/// Where a product entered the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Placement {
    Front,
    End,
}

/// One observable state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    ProductAdded {
        product_id: String,
        placement: Placement,
    },
    ProductRemoved {
        product_id: String,
    },
    ProductMovedToFront {
        product_id: String,
    },
    /// The placement pass pulled a featured product into the front window
    FeaturedPlaced {
        product_id: String,
        slot: usize,
    },
    /// A corrupted forward link was cut; `dropped` products are gone for good
    CycleRepaired {
        cycle_start: String,
        dropped: Vec<String>,
    },
    CartItemAdded {
        product_id: String,
        quantity: u32,
    },
    CartItemRemoved {
        product_id: String,
    },
    CartQuantityUpdated {
        product_id: String,
        quantity: u32,
    },
    UndoApplied {
        action: CartAction,
    },
    OrderEnqueued {
        order_id: String,
        vip: bool,
        position: usize,
    },
    OrderDequeued {
        order_id: String,
    },
    CustomerAdded {
        customer_id: u64,
    },
    CustomerRemoved {
        customer_id: u64,
    },
    CustomerPromoted {
        customer_id: u64,
        from_depth: usize,
        to_depth: usize,
    },
    RelationAdded {
        a: String,
        b: String,
    },
}

/// Events a component holds before the oldest are discarded.
pub const EVENT_BUFFER_LIMIT: usize = 1024;

/// Pending events of one component, oldest first.
#[derive(Debug, Clone)]
pub struct EventBuffer {
    pending: VecDeque<StoreEvent>,
    limit: usize,
    dropped: u64,
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::with_limit(EVENT_BUFFER_LIMIT)
    }
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding at most `limit` events (at least one)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            limit: limit.max(1),
            dropped: 0,
        }
    }

    /// Append an event, discarding the oldest one when full
    #[inline]
    pub fn push(&mut self, event: StoreEvent) {
        if self.pending.len() == self.limit {
            self.pending.pop_front();
            if self.dropped == 0 {
                tracing::warn!(limit = self.limit, "event buffer full, discarding oldest events");
            }
            self.dropped += 1;
        }
        self.pending.push_back(event);
    }

    /// Take every pending event, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<StoreEvent> {
        self.dropped = 0;
        self.pending.drain(..).collect()
    }

    /// Events discarded since the last drain
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Receives events fanned out by the [`Storefront`](crate::Storefront).
pub trait StoreObserver: Send {
    fn on_event(&mut self, event: &StoreEvent);
}

/// Observer that logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StoreObserver for TracingObserver {
    fn on_event(&mut self, event: &StoreEvent) {
        match event {
            StoreEvent::CycleRepaired { cycle_start, dropped } => {
                tracing::warn!(%cycle_start, dropped = dropped.len(), "carousel cycle repaired");
            }
            other => tracing::info!(event = ?other, "store event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_drain_empties() {
        let mut buffer = EventBuffer::new();
        assert!(buffer.is_empty());

        buffer.push(StoreEvent::OrderDequeued {
            order_id: "O-1".into(),
        });
        buffer.push(StoreEvent::CustomerAdded { customer_id: 4 });
        assert_eq!(buffer.len(), 2);

        let drained = buffer.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(
            drained[0],
            StoreEvent::OrderDequeued {
                order_id: "O-1".into()
            }
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_buffer_discards_oldest_when_full() {
        let mut buffer = EventBuffer::with_limit(4);
        for customer_id in 0..10 {
            buffer.push(StoreEvent::CustomerAdded { customer_id });
        }

        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.dropped(), 6);

        let drained = buffer.drain();
        let ids: Vec<u64> = drained
            .iter()
            .map(|event| match event {
                StoreEvent::CustomerAdded { customer_id } => *customer_id,
                other => panic!("unexpected event: {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec![6, 7, 8, 9]);
        assert_eq!(buffer.dropped(), 0);
    }

    #[test]
    fn test_buffer_default_limit() {
        let mut buffer = EventBuffer::new();
        assert_eq!(buffer.limit(), EVENT_BUFFER_LIMIT);
        assert_eq!(EventBuffer::with_limit(0).limit(), 1);

        for customer_id in 0..(EVENT_BUFFER_LIMIT as u64 * 3) {
            buffer.push(StoreEvent::CustomerAdded { customer_id });
        }
        assert_eq!(buffer.len(), EVENT_BUFFER_LIMIT);
        assert_eq!(buffer.dropped(), EVENT_BUFFER_LIMIT as u64 * 2);
    }

    #[test]
    fn test_event_serializes_tagged() {
        let event = StoreEvent::CustomerPromoted {
            customer_id: 40,
            from_depth: 2,
            to_depth: 0,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "customer_promoted");
        assert_eq!(json["customer_id"], 40);
        assert_eq!(json["to_depth"], 0);
    }
}
