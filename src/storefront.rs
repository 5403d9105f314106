//! Storefront facade.
//!
//! ## Command Surface
//!
//! Front ends (menus, RPC handlers, scripted drivers) talk to the store
//! through [`Command`] values and read back a [`Reply`]:
//!
//! ```text
//! AddProduct { product_id, quantity }   -> Ack | InvalidQuantity
//! RemoveProduct(product_id)             -> Ack | NotFound
//! PromoteCustomer(id)                   -> Ack | NotFound
//! SubmitOrder { order_id, vip }         -> Ack | EmptyCart
//! ValidateCarousel                      -> NoCycle | Repaired
//! ```
//!
//! After every command the facade drains the events of each component and
//! hands them to subscribed observers in emission order.
//!
//! ## Example
//!
//! ```
//! use brightcart::{Command, Reply, Storefront};
//!
//! let mut store = Storefront::default();
//!
//! let reply = store.execute(Command::AddProduct {
//!     product_id: "P1".into(),
//!     quantity: 2,
//! });
//! assert_eq!(reply, Reply::Ack);
//!
//! let reply = store.execute(Command::SubmitOrder {
//!     order_id: "O-1".into(),
//!     vip: false,
//! });
//! assert_eq!(reply, Reply::Ack);
//! ```

use crate::carousel::{CycleRepair, ProductCarousel, Validation};
use crate::cart::CartLedger;
use crate::config::StoreConfig;
use crate::customers::CustomerIndex;
use crate::error::StoreError;
use crate::events::{StoreEvent, StoreObserver};
use crate::recommend::RecommendationGraph;
use crate::types::{Customer, OrderReceipt, Product};

/// One request against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Carousel
    ListProduct(Product),
    ListProductFront(Product),
    DelistProduct(String),
    MoveToFront(String),
    ValidateCarousel,

    // Cart
    AddProduct { product_id: String, quantity: u32 },
    RemoveProduct(String),
    UpdateQuantity { product_id: String, quantity: u32 },
    UndoCart,
    SubmitOrder { order_id: String, vip: bool },
    ProcessNextOrder,

    // Customers
    AddCustomer(Customer),
    RemoveCustomer(u64),
    PromoteCustomer(u64),
    RecordPurchase(u64),

    // Recommendations
    AddRelation { a: String, b: String },
    Recommend { product_id: String, k: usize },
}

/// Outcome of a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ack,
    NotFound,
    Duplicate,
    EmptyCart,
    NothingToUndo,
    /// A cart add asked for zero units
    InvalidQuantity,
    /// No order was waiting
    Empty,
    NoCycle,
    Repaired(CycleRepair),
    Processed(OrderReceipt),
    Recommendations(Vec<String>),
    /// Internal invariant violated; the command had no effect
    Rejected(&'static str),
}

impl From<StoreError> for Reply {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ProductNotFound(_)
            | StoreError::NotInCart(_)
            | StoreError::CustomerNotFound(_) => Reply::NotFound,
            StoreError::DuplicateProduct(_) | StoreError::DuplicateCustomer(_) => Reply::Duplicate,
            StoreError::EmptyCart => Reply::EmptyCart,
            StoreError::NothingToUndo => Reply::NothingToUndo,
            StoreError::InvalidQuantity(_) => Reply::InvalidQuantity,
            StoreError::InvalidState(reason) => Reply::Rejected(reason),
        }
    }
}

fn ack<T>(result: crate::error::Result<T>) -> Reply {
    match result {
        Ok(_) => Reply::Ack,
        Err(err) => err.into(),
    }
}

/// Owns every store component and routes commands to them.
pub struct Storefront {
    config: StoreConfig,
    carousel: ProductCarousel,
    cart: CartLedger,
    customers: CustomerIndex,
    recommendations: RecommendationGraph,
    observers: Vec<Box<dyn StoreObserver>>,
}

impl Default for Storefront {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("config", &self.config)
            .field("carousel", &self.carousel.len())
            .field("cart", &self.cart.items().len())
            .field("customers", &self.customers.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Storefront {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            carousel: ProductCarousel::with_featured_window(config.featured_window),
            cart: CartLedger::with_config(&config),
            customers: CustomerIndex::with_policy(config.promotion_policy),
            recommendations: RecommendationGraph::new(),
            observers: Vec::new(),
            config,
        }
    }

    /// Register an observer for every event emitted from now on
    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn carousel(&self) -> &ProductCarousel {
        &self.carousel
    }

    pub fn cart(&self) -> &CartLedger {
        &self.cart
    }

    pub fn customers(&self) -> &CustomerIndex {
        &self.customers
    }

    pub fn recommendations(&self) -> &RecommendationGraph {
        &self.recommendations
    }

    /// Run one command and publish the events it produced
    pub fn execute(&mut self, command: Command) -> Reply {
        let reply = self.apply(command);
        self.publish();
        reply
    }

    fn apply(&mut self, command: Command) -> Reply {
        match command {
            Command::ListProduct(product) => ack(self.carousel.add_end(product)),
            Command::ListProductFront(product) => ack(self.carousel.add_front(product)),
            Command::DelistProduct(id) => ack(self.carousel.remove(&id)),
            Command::MoveToFront(id) => ack(self.carousel.move_to_front(&id)),
            Command::ValidateCarousel => match self.carousel.validate() {
                Validation::NoCycle => Reply::NoCycle,
                Validation::Repaired(repair) => Reply::Repaired(repair),
            },

            Command::AddProduct {
                product_id,
                quantity,
            } => ack(self.cart.add_product(&product_id, quantity)),
            Command::RemoveProduct(id) => ack(self.cart.remove_product(&id)),
            Command::UpdateQuantity {
                product_id,
                quantity,
            } => ack(self.cart.update_quantity(&product_id, quantity)),
            Command::UndoCart => ack(self.cart.undo_last_action()),
            Command::SubmitOrder { order_id, vip } => ack(self.cart.submit_order(&order_id, vip)),
            Command::ProcessNextOrder => match self.cart.process_next_order() {
                Some(receipt) => Reply::Processed(receipt),
                None => Reply::Empty,
            },

            Command::AddCustomer(customer) => ack(self.customers.insert(customer)),
            Command::RemoveCustomer(id) => ack(self.customers.delete(id)),
            Command::PromoteCustomer(id) => ack(self.customers.promote(id)),
            Command::RecordPurchase(id) => match self.customers.find_mut(id) {
                Some(customer) => {
                    customer.record_purchase();
                    Reply::Ack
                }
                None => Reply::NotFound,
            },

            Command::AddRelation { a, b } => {
                self.recommendations.add_relation(&a, &b);
                Reply::Ack
            }
            Command::Recommend { product_id, k } => {
                Reply::Recommendations(self.recommendations.recommend(&product_id, k))
            }
        }
    }

    /// Drain every component and fan the events out to observers
    fn publish(&mut self) {
        let events: Vec<StoreEvent> = self
            .carousel
            .drain_events()
            .into_iter()
            .chain(self.cart.drain_events())
            .chain(self.customers.drain_events())
            .chain(self.recommendations.drain_events())
            .collect();

        for event in &events {
            for observer in &mut self.observers {
                observer.on_event(event);
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customers::PromotionPolicy;
    use rust_decimal::Decimal;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<StoreEvent>>>);

    impl StoreObserver for Recorder {
        fn on_event(&mut self, event: &StoreEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    fn product(id: &str, featured: bool) -> Product {
        Product::new(id, id, Decimal::new(999, 2), featured)
    }

    #[test]
    fn test_storefront_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Storefront>();
    }

    #[test]
    fn test_cart_commands() {
        let mut store = Storefront::default();

        assert_eq!(store.execute(Command::RemoveProduct("P1".into())), Reply::NotFound);
        assert_eq!(store.execute(Command::UndoCart), Reply::NothingToUndo);
        assert_eq!(
            store.execute(Command::SubmitOrder {
                order_id: "O-1".into(),
                vip: false
            }),
            Reply::EmptyCart
        );

        store.execute(Command::AddProduct {
            product_id: "P1".into(),
            quantity: 2,
        });
        assert_eq!(
            store.execute(Command::UpdateQuantity {
                product_id: "P1".into(),
                quantity: 5
            }),
            Reply::Ack
        );
        assert_eq!(store.cart().quantity("P1"), Some(5));

        assert_eq!(
            store.execute(Command::SubmitOrder {
                order_id: "O-1".into(),
                vip: true
            }),
            Reply::Ack
        );
        match store.execute(Command::ProcessNextOrder) {
            Reply::Processed(receipt) => {
                assert_eq!(receipt.order_id, "O-1");
                assert_eq!(receipt.item_count, 1);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
        assert_eq!(store.execute(Command::ProcessNextOrder), Reply::Empty);
    }

    #[test]
    fn test_carousel_commands() {
        let mut store = Storefront::default();

        assert_eq!(store.execute(Command::ListProduct(product("A", false))), Reply::Ack);
        assert_eq!(store.execute(Command::ListProduct(product("B", true))), Reply::Ack);
        assert_eq!(
            store.execute(Command::ListProduct(product("A", false))),
            Reply::Duplicate
        );
        assert_eq!(store.carousel().ids(), vec!["B", "A"]);

        assert_eq!(store.execute(Command::MoveToFront("Z".into())), Reply::NotFound);
        assert_eq!(store.execute(Command::DelistProduct("B".into())), Reply::Ack);
        assert_eq!(store.execute(Command::ValidateCarousel), Reply::NoCycle);
    }

    #[test]
    fn test_customer_commands_follow_policy() {
        let config = StoreConfig {
            promotion_policy: PromotionPolicy::Splice,
            ..StoreConfig::default()
        };
        let mut store = Storefront::new(config);

        for id in [50, 30, 70, 20, 40] {
            store.execute(Command::AddCustomer(Customer::new(id, "", "")));
        }
        assert_eq!(
            store.execute(Command::AddCustomer(Customer::new(30, "", ""))),
            Reply::Duplicate
        );

        assert_eq!(store.execute(Command::PromoteCustomer(40)), Reply::Ack);
        assert_eq!(store.execute(Command::PromoteCustomer(99)), Reply::NotFound);
        assert_eq!(store.customers().in_order(), vec![20, 30, 40, 50, 70]);
        assert_eq!(store.customers().root_id(), Some(50));
        assert_eq!(store.customers().depth_of(40), Some(1));

        assert_eq!(store.execute(Command::RecordPurchase(70)), Reply::Ack);
        assert_eq!(store.customers().find(70).unwrap().purchase_count, 1);
        assert_eq!(store.execute(Command::RemoveCustomer(70)), Reply::Ack);
        assert_eq!(store.execute(Command::RecordPurchase(70)), Reply::NotFound);
    }

    #[test]
    fn test_recommend_commands() {
        let mut store = Storefront::default();
        store.execute(Command::AddRelation {
            a: "P1".into(),
            b: "P2".into(),
        });

        assert_eq!(
            store.execute(Command::Recommend {
                product_id: "P2".into(),
                k: 3
            }),
            Reply::Recommendations(vec!["P1".into()])
        );
    }

    #[test]
    fn test_observers_receive_events_in_order() {
        let recorder = Recorder::default();
        let mut store = Storefront::default();
        store.subscribe(recorder.clone());

        store.execute(Command::AddProduct {
            product_id: "P1".into(),
            quantity: 1,
        });
        store.execute(Command::SubmitOrder {
            order_id: "O-1".into(),
            vip: false,
        });
        store.execute(Command::ProcessNextOrder);

        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], StoreEvent::CartItemAdded { .. }));
        assert!(matches!(events[1], StoreEvent::OrderEnqueued { .. }));
        assert!(matches!(events[2], StoreEvent::OrderDequeued { .. }));
    }

    #[test]
    fn test_failed_command_emits_nothing() {
        let recorder = Recorder::default();
        let mut store = Storefront::default();
        store.subscribe(recorder.clone());

        store.execute(Command::RemoveCustomer(1));
        store.execute(Command::UndoCart);

        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_zero_quantity_add_is_rejected() {
        let recorder = Recorder::default();
        let mut store = Storefront::default();
        store.subscribe(recorder.clone());

        let reply = store.execute(Command::AddProduct {
            product_id: "P1".into(),
            quantity: 0,
        });

        assert_eq!(reply, Reply::InvalidQuantity);
        assert!(store.cart().is_empty());
        assert_eq!(store.cart().undo_depth(), 0);
        assert!(recorder.0.lock().unwrap().is_empty());
    }
}
