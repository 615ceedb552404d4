//! # POS Session
//!
//! Ties the coordinators together for one operator session.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          PosSession                                     │
//! │                                                                         │
//! │  CartState ─────────┐                                                  │
//! │                     ├──► PurchaseCoordinator.submit ──► feed refresh   │
//! │  IdentityResolver ──┘                                                  │
//! │                                                                         │
//! │  RecentPurchaseFeed ◄── ReversalCoordinator.reverse                    │
//! │                                                                         │
//! │  Catalog, LocationDirectory: read-only collaborators                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! CartState and IdentityResolver are independent; they share no mutable
//! data and only compose at submission time, so no locking spans the two.

use std::sync::Arc;

use tracing::info;

use canteen_client::Backend;
use canteen_core::types::Purchase;

use crate::cart_state::CartState;
use crate::catalog::Catalog;
use crate::config::{LocationDirectory, SessionConfig};
use crate::error::SessionResult;
use crate::events::PosEventEmitter;
use crate::feed::RecentPurchaseFeed;
use crate::purchase::PurchaseCoordinator;
use crate::resolver::IdentityResolver;
use crate::reversal::ReversalCoordinator;

/// One operator session at one POS terminal.
pub struct PosSession {
    config: SessionConfig,

    pub cart: CartState,
    pub resolver: IdentityResolver,
    pub purchases: PurchaseCoordinator,
    pub reversals: ReversalCoordinator,
    pub feed: RecentPurchaseFeed,
    pub catalog: Catalog,
    pub locations: LocationDirectory,
}

impl PosSession {
    /// Builds a session from explicit configuration - no ambient state.
    pub fn new(
        config: SessionConfig,
        backend: Arc<dyn Backend>,
        emitter: Arc<dyn PosEventEmitter>,
    ) -> Self {
        let resolver = IdentityResolver::new(
            Arc::clone(&backend),
            Arc::clone(&emitter),
            config.debounce_window(),
        );
        let purchases = PurchaseCoordinator::new(Arc::clone(&backend), Arc::clone(&emitter));
        let reversals = ReversalCoordinator::new(Arc::clone(&backend), Arc::clone(&emitter));
        let feed = RecentPurchaseFeed::new(Arc::clone(&backend), Arc::clone(&emitter));
        let catalog = Catalog::new(Arc::clone(&backend), Arc::clone(&emitter));

        PosSession {
            config,
            cart: CartState::new(),
            resolver,
            purchases,
            reversals,
            feed,
            catalog,
            locations: LocationDirectory::new(),
        }
    }

    /// Loads initial data: locations, catalog, recent purchases.
    pub async fn start(&self, backend: &dyn Backend) -> SessionResult<()> {
        self.locations.load(backend).await?;
        if let Some(location_id) = self.config.location_id.clone() {
            self.locations.select(&location_id)?;
        }
        self.catalog.load().await?;
        self.feed.refresh().await?;
        info!("POS session started");
        Ok(())
    }

    /// Submits the current cart against the resolved customer.
    pub async fn submit_purchase(&self) -> SessionResult<Purchase> {
        let customer = self.resolver.resolved_customer();
        let location = self.locations.selected();
        self.purchases
            .submit(&self.cart, customer.as_ref(), location.as_ref(), &self.feed)
            .await
    }

    /// Reverses one purchase from the feed.
    pub async fn reverse_purchase(&self, purchase_id: &str) -> SessionResult<()> {
        self.reversals.reverse(&self.feed, purchase_id).await
    }

    /// The configuration this session was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Tears the session down; outstanding completions will not apply.
    pub fn shutdown(&self) {
        self.resolver.shutdown();
    }
}

impl Drop for PosSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{customer, product, RecordingEmitter};
    use canteen_client::MockBackend;

    #[tokio::test(start_paused = true)]
    async fn test_scan_resolve_submit_flow() {
        let mock = Arc::new(
            MockBackend::new()
                .with_customers(vec![customer("c1", "STU001")])
                .with_items(vec![product("A", 500), product("B", 250)]),
        );
        let emitter = Arc::new(RecordingEmitter::default());
        let session = PosSession::new(
            SessionConfig::default(),
            Arc::clone(&mock) as Arc<dyn Backend>,
            emitter,
        );

        // Scan A, A, B.
        session.cart.with_cart_mut(|c| {
            c.add_item(&product("A", 500));
            c.add_item(&product("A", 500));
            c.add_item(&product("B", 250));
        });

        // Resolve the customer by typed registration number.
        session.resolver.on_keystroke("STU001").await.unwrap();
        assert!(session.resolver.resolved_customer().is_some());

        let list_calls_before = mock.list_calls();
        let token_before = session.feed.refresh_token();

        let purchase = session.submit_purchase().await.unwrap();

        // Payload aggregated in first-seen order: [{A,2},{B,1}].
        assert_eq!(purchase.lines.len(), 2);
        assert_eq!(
            (purchase.lines[0].product_id.as_str(), purchase.lines[0].quantity),
            ("A", 2)
        );
        assert_eq!(
            (purchase.lines[1].product_id.as_str(), purchase.lines[1].quantity),
            ("B", 1)
        );

        // Cart cleared, exactly one feed refresh triggered.
        assert!(session.cart.with_cart(|c| c.is_empty()));
        assert_eq!(mock.list_calls(), list_calls_before + 1);
        assert_eq!(session.feed.refresh_token(), token_before + 1);

        // The new purchase shows up in the refreshed feed.
        assert!(session.feed.get(&purchase.id).is_some());
    }

    #[tokio::test]
    async fn test_start_loads_locations_catalog_and_feed() {
        let mock = Arc::new(
            MockBackend::new()
                .with_items(vec![product("A", 500)])
                .with_locations(vec![canteen_core::types::Location {
                    id: "loc-1".to_string(),
                    name: "Main Canteen".to_string(),
                }]),
        );
        let emitter = Arc::new(RecordingEmitter::default());
        let session = PosSession::new(
            SessionConfig::default(),
            Arc::clone(&mock) as Arc<dyn Backend>,
            emitter,
        );

        session.start(mock.as_ref()).await.unwrap();

        assert_eq!(session.locations.selected().map(|l| l.id), Some("loc-1".to_string()));
        assert_eq!(session.catalog.items().len(), 1);
        assert_eq!(session.feed.refresh_token(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_tears_down_resolver() {
        let mock = Arc::new(
            MockBackend::new()
                .with_customers(vec![customer("c1", "STU001")])
                .with_latency(std::time::Duration::from_millis(500)),
        );
        let emitter = Arc::new(RecordingEmitter::default());
        let session = PosSession::new(
            SessionConfig::default(),
            Arc::clone(&mock) as Arc<dyn Backend>,
            emitter,
        );

        let handle = session.resolver.on_keystroke("STU001");
        drop(session);
        handle.await.unwrap();

        // The keystroke's timer fired after teardown: no request went out.
        assert_eq!(mock.search_calls(), 0);
    }
}
