//! End-to-end walkthrough against a scripted backend: resolve a customer,
//! scan a few items, submit, then reverse the purchase.
//!
//! Run with `cargo run -p canteen-session --example pos_demo`.

use std::sync::Arc;

use canteen_client::{Backend, MockBackend};
use canteen_core::types::{Customer, Location, Product};
use canteen_session::{PosSession, SessionConfig, TracingEmitter};

fn seeded_backend() -> MockBackend {
    MockBackend::new()
        .with_customers(vec![Customer {
            id: "cust-1".to_string(),
            display_name: "Asad Mahmood".to_string(),
            registration_number: "2021-CS-042".to_string(),
        }])
        .with_items(vec![
            Product {
                id: "item-1".to_string(),
                name: "Chicken Biryani".to_string(),
                unit_price_cents: 35_000,
                stock_quantity: 40,
            },
            Product {
                id: "item-2".to_string(),
                name: "Mineral Water".to_string(),
                unit_price_cents: 6_000,
                stock_quantity: 120,
            },
        ])
        .with_locations(vec![Location {
            id: "loc-main".to_string(),
            name: "Main Canteen".to_string(),
        }])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let backend = Arc::new(seeded_backend());
    let emitter = Arc::new(TracingEmitter);
    let session = PosSession::new(
        SessionConfig::default(),
        Arc::clone(&backend) as Arc<dyn Backend>,
        emitter,
    );

    session.start(backend.as_ref()).await?;

    // Operator types a registration number; the debounce timer fires and
    // the first exact match becomes the resolved customer.
    session.resolver.on_keystroke("2021-CS-042").await?;
    let customer = session
        .resolver
        .resolved_customer()
        .ok_or("customer did not resolve")?;
    tracing::info!(customer = %customer.display_name, "customer resolved");

    // Scan two biryani plates and a bottle of water.
    let biryani = session.catalog.get("item-1").ok_or("missing item-1")?;
    let water = session.catalog.get("item-2").ok_or("missing item-2")?;
    session.cart.with_cart_mut(|cart| {
        cart.add_item(&biryani);
        cart.add_item(&biryani);
        cart.add_item(&water);
    });
    tracing::info!(
        items = session.cart.with_cart(|c| c.len()),
        advisory_total = session.cart.with_cart(|c| c.advisory_total_cents()),
        "cart ready"
    );

    let purchase = session.submit_purchase().await?;
    tracing::info!(
        purchase_id = %purchase.id,
        total = purchase.total_amount_cents,
        "purchase recorded"
    );

    // Change of mind: reverse it straight from the feed.
    session.reverse_purchase(&purchase.id).await?;
    tracing::info!(purchase_id = %purchase.id, "purchase reversed");

    Ok(())
}
