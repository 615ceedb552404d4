//! # Purchase Coordinator
//!
//! Validates and submits a purchase from the cart and the resolved
//! identity.
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit()                                                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  aggregate cart ──► validate (empty? no customer?) ──► ValidationError  │
//! │     │                                  (local, zero network calls)      │
//! │     ▼                                                                   │
//! │  busy guard ──► already submitting? ──► RequestInFlight (local)         │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  POST /purchases                                                        │
//! │     ├── Ok: clear cart, refresh feed, success notice                    │
//! │     └── Err: cart and identity UNCHANGED, error notice, no retry        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The busy guard is the engine-side stand-in for the disabled submit
//! button: a local request-coalescing measure, not a substitute for
//! server-side idempotency.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use canteen_client::Backend;
use canteen_core::types::{CreatePurchaseRequest, Customer, Location, Purchase};
use canteen_core::validation::validate_submit;

use crate::cart_state::CartState;
use crate::error::{SessionError, SessionResult};
use crate::events::PosEventEmitter;
use crate::feed::RecentPurchaseFeed;

/// Submits purchases for one POS session, one at a time.
pub struct PurchaseCoordinator {
    backend: Arc<dyn Backend>,
    emitter: Arc<dyn PosEventEmitter>,

    /// True while a create-purchase request is outstanding.
    in_flight: AtomicBool,
}

impl PurchaseCoordinator {
    pub fn new(backend: Arc<dyn Backend>, emitter: Arc<dyn PosEventEmitter>) -> Self {
        PurchaseCoordinator {
            backend,
            emitter,
            in_flight: AtomicBool::new(false),
        }
    }

    /// True while a submit is outstanding (the UI disables the control).
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Validates and submits the current cart against the resolved customer.
    ///
    /// On success the cart is cleared and the feed refreshed; on any
    /// failure the cart and the resolved identity are left untouched so
    /// the operator can edit or simply retry.
    pub async fn submit(
        &self,
        cart: &CartState,
        customer: Option<&Customer>,
        location: Option<&Location>,
        feed: &RecentPurchaseFeed,
    ) -> SessionResult<Purchase> {
        let payload = cart.with_cart(|c| c.to_aggregated_payload());

        // Local preconditions: zero network calls on violation.
        validate_submit(&payload, customer.map(|c| c.id.as_str()))?;
        let Some(customer) = customer else {
            return Err(canteen_core::ValidationError::CustomerRequired.into());
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::RequestInFlight("purchase"));
        }

        let request = CreatePurchaseRequest {
            customer_id: customer.id.clone(),
            products: payload,
            location_id: location.map(|l| l.id.clone()),
        };
        debug!(
            customer_id = %request.customer_id,
            lines = request.products.len(),
            "submitting purchase"
        );

        let result = self.backend.create_purchase(&request).await;
        self.in_flight.store(false, Ordering::SeqCst);

        match result {
            Ok(purchase) => {
                cart.with_cart_mut(|c| c.clear());
                info!(
                    purchase_id = %purchase.id,
                    total_cents = purchase.total_amount_cents,
                    "purchase created"
                );
                self.emitter.notice_success("Purchase processed successfully");

                // The new purchase should show up in the recent feed; a
                // refresh failure is non-fatal to the submit itself.
                if let Err(err) = feed.refresh().await {
                    warn!(error = %err, "feed refresh after purchase failed");
                }

                Ok(purchase)
            }
            Err(err) => {
                self.emitter
                    .notice_error(&format!("Purchase failed: {}", err));
                Err(err.into())
            }
        }
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
    use canteen_core::ValidationError;

    fn coordinator_with(
        mock: Arc<MockBackend>,
        emitter: Arc<RecordingEmitter>,
    ) -> (PurchaseCoordinator, RecentPurchaseFeed) {
        let feed = RecentPurchaseFeed::new(
            Arc::clone(&mock) as Arc<dyn Backend>,
            Arc::clone(&emitter) as Arc<dyn PosEventEmitter>,
        );
        let coordinator = PurchaseCoordinator::new(mock, emitter);
        (coordinator, feed)
    }

    #[tokio::test]
    async fn test_empty_cart_fails_locally_with_zero_network_calls() {
        let mock = Arc::new(MockBackend::new());
        let emitter = Arc::new(RecordingEmitter::default());
        let (coordinator, feed) = coordinator_with(Arc::clone(&mock), emitter);

        let cart = CartState::new();
        let asha = customer("c1", "STU001");

        let err = coordinator
            .submit(&cart, Some(&asha), None, &feed)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::EmptyCart)
        ));
        assert_eq!(mock.create_calls(), 0);
        assert_eq!(mock.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_customer_fails_locally_with_zero_network_calls() {
        let mock = Arc::new(MockBackend::new());
        let emitter = Arc::new(RecordingEmitter::default());
        let (coordinator, feed) = coordinator_with(Arc::clone(&mock), emitter);

        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_item(&product("A", 500)));

        let err = coordinator.submit(&cart, None, None, &feed).await.unwrap_err();

        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::CustomerRequired)
        ));
        assert_eq!(mock.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_success_clears_cart_and_refreshes_feed_once() {
        let mock = Arc::new(
            MockBackend::new()
                .with_customers(vec![customer("c1", "STU001")])
                .with_items(vec![product("A", 500), product("B", 250)]),
        );
        let emitter = Arc::new(RecordingEmitter::default());
        let (coordinator, feed) = coordinator_with(Arc::clone(&mock), Arc::clone(&emitter));

        let cart = CartState::new();
        cart.with_cart_mut(|c| {
            c.add_item(&product("A", 500));
            c.add_item(&product("A", 500));
            c.add_item(&product("B", 250));
        });
        let asha = customer("c1", "STU001");
        let token_before = feed.refresh_token();

        let purchase = coordinator
            .submit(&cart, Some(&asha), None, &feed)
            .await
            .unwrap();

        assert_eq!(purchase.lines.len(), 2);
        assert_eq!(purchase.lines[0].product_id, "A");
        assert_eq!(purchase.lines[0].quantity, 2);
        assert_eq!(purchase.lines[1].product_id, "B");
        assert_eq!(purchase.lines[1].quantity, 1);
        // Server-side total: 2×500 + 1×250.
        assert_eq!(purchase.total_amount_cents, 1250);

        assert!(cart.with_cart(|c| c.is_empty()));
        assert_eq!(mock.create_calls(), 1);
        assert_eq!(mock.list_calls(), 1);
        assert_eq!(feed.refresh_token(), token_before + 1);
        assert_eq!(
            emitter.successes(),
            vec!["Purchase processed successfully".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failure_leaves_cart_unchanged() {
        let mock = Arc::new(MockBackend::new().with_customers(vec![customer("c1", "STU001")]));
        mock.fail_create(true);
        let emitter = Arc::new(RecordingEmitter::default());
        let (coordinator, feed) = coordinator_with(Arc::clone(&mock), Arc::clone(&emitter));

        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_item(&product("A", 500)));
        let asha = customer("c1", "STU001");

        let err = coordinator
            .submit(&cart, Some(&asha), None, &feed)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Backend(_)));
        assert_eq!(cart.with_cart(|c| c.len()), 1);
        assert_eq!(mock.list_calls(), 0);
        assert_eq!(emitter.errors().len(), 1);
        assert!(!coordinator.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_submit_is_rejected_locally() {
        let mock = Arc::new(
            MockBackend::new()
                .with_customers(vec![customer("c1", "STU001")])
                .with_items(vec![product("A", 500)])
                .with_latency(std::time::Duration::from_millis(200)),
        );
        let emitter = Arc::new(RecordingEmitter::default());
        let (coordinator, feed) = coordinator_with(Arc::clone(&mock), emitter);

        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_item(&product("A", 500)));
        let asha = customer("c1", "STU001");

        let (first, second) = tokio::join!(
            coordinator.submit(&cart, Some(&asha), None, &feed),
            coordinator.submit(&cart, Some(&asha), None, &feed),
        );

        let outcomes = [first.is_ok(), second.is_ok()];
        assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
        assert_eq!(mock.create_calls(), 1);

        let rejected = if outcomes[0] { second } else { first };
        assert!(matches!(
            rejected.unwrap_err(),
            SessionError::RequestInFlight("purchase")
        ));
    }
}
