//! BrightCart - Binary Entry Point
//!
//! Runs a scripted session against a [`Storefront`] and prints the resulting
//! state. Events are logged through `tracing`; set `RUST_LOG=debug` to see
//! every mutation.

use brightcart::types::{Customer, Product};
use brightcart::{Command, Reply, StoreConfig, Storefront, TracingObserver};
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "brightcart=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = StoreConfig::from_env()?;
    tracing::info!(?config, "configuration loaded");

    let mut store = Storefront::new(config);
    store.subscribe(TracingObserver);

    println!("===========================================");
    println!("  BrightCart - storefront engine demo");
    println!("===========================================");
    println!();

    // Catalog
    let catalog = [
        ("P1", "Desk Lamp", 2499, false),
        ("P2", "Espresso Cup", 899, true),
        ("P3", "Notebook", 450, false),
        ("P4", "Headphones", 7900, true),
        ("P5", "Plant Pot", 1250, false),
    ];
    for (id, name, cents, featured) in catalog {
        let product = Product::new(id, name, Decimal::new(cents, 2), featured).with_stock(10);
        store.execute(Command::ListProduct(product));
    }
    store.execute(Command::MoveToFront("P5".into()));
    println!("Carousel: {:?}", store.carousel().ids());
    println!("Validate: {:?}", store.execute(Command::ValidateCarousel));
    println!();

    // Cart
    for (id, quantity) in [("P1", 2), ("P2", 1), ("P1", 1)] {
        store.execute(Command::AddProduct {
            product_id: id.into(),
            quantity,
        });
    }
    store.execute(Command::UpdateQuantity {
        product_id: "P2".into(),
        quantity: 4,
    });
    store.execute(Command::UndoCart);
    println!("Cart: {:?}", store.cart().items());

    for (order_id, vip) in [("O-1", false), ("O-2", false), ("O-3", true)] {
        store.execute(Command::AddProduct {
            product_id: "P3".into(),
            quantity: 1,
        });
        store.execute(Command::SubmitOrder {
            order_id: order_id.into(),
            vip,
        });
    }
    println!("Order queue: {:?}", store.cart().pending_orders().ids());

    while let Reply::Processed(receipt) = store.execute(Command::ProcessNextOrder) {
        println!(
            "  processed {} ({} items, vip={}) digest {}",
            receipt.order_id,
            receipt.item_count,
            receipt.vip,
            &receipt.digest_hex()[..16]
        );
    }
    println!();

    // Customers
    for (id, name) in [(50, "Ada"), (30, "Brian"), (70, "Chen"), (20, "Dana"), (40, "Eli")] {
        let email = format!("{}@example.com", name.to_lowercase());
        store.execute(Command::AddCustomer(Customer::new(id, name, email)));
    }
    println!(
        "Customers (in-order): {:?}, root {:?}",
        store.customers().in_order(),
        store.customers().root_id()
    );
    store.execute(Command::PromoteCustomer(40));
    println!(
        "After promote(40) [{}]: {:?}, root {:?}",
        store.customers().policy(),
        store.customers().in_order(),
        store.customers().root_id()
    );
    println!();

    // Recommendations
    store.execute(Command::AddRelation {
        a: "P1".into(),
        b: "P3".into(),
    });
    store.execute(Command::AddRelation {
        a: "P1".into(),
        b: "P4".into(),
    });
    println!(
        "Recommended with P1: {:?}",
        store.execute(Command::Recommend {
            product_id: "P1".into(),
            k: 2
        })
    );

    Ok(())
}
