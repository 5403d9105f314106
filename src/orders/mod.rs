//! Order processing queue.
//!
//! Orders are cart snapshots produced by
//! [`CartLedger::submit_order`](crate::cart::CartLedger::submit_order). The
//! queue owns them until they are dequeued, then ownership moves to the
//! caller.

pub mod queue;

pub use queue::OrderQueue;
