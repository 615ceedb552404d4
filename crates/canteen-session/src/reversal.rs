//! # Reversal Coordinator
//!
//! Reverses a completed purchase exactly once.
//!
//! A purchase whose local `reversed` flag is already set is rejected here
//! with a conflict, before any network call. While a reversal for a given
//! purchase id is outstanding, a second attempt for the same id is rejected
//! locally (the per-row disabled button). The server independently enforces
//! reverse-once; the client guards are a UX measure, not the correctness
//! guarantee.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use canteen_client::Backend;
use canteen_core::validation::validate_reversal;

use crate::error::{SessionError, SessionResult};
use crate::events::PosEventEmitter;
use crate::feed::RecentPurchaseFeed;

/// Reverses purchases for one POS session.
pub struct ReversalCoordinator {
    backend: Arc<dyn Backend>,
    emitter: Arc<dyn PosEventEmitter>,

    /// Purchase ids with an outstanding reversal request.
    in_flight: Mutex<HashSet<String>>,
}

impl ReversalCoordinator {
    pub fn new(backend: Arc<dyn Backend>, emitter: Arc<dyn PosEventEmitter>) -> Self {
        ReversalCoordinator {
            backend,
            emitter,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// True while a reversal for this purchase is outstanding.
    pub fn is_reversing(&self, purchase_id: &str) -> bool {
        self.in_flight
            .lock()
            .expect("Reversal mutex poisoned")
            .contains(purchase_id)
    }

    /// Reverses one purchase.
    ///
    /// On success the purchase is marked reversed in the feed snapshot
    /// (the next refresh would show the same thing); on failure nothing
    /// changes and the operator may re-trigger.
    pub async fn reverse(
        &self,
        feed: &RecentPurchaseFeed,
        purchase_id: &str,
    ) -> SessionResult<()> {
        // Local conflict check against the last known snapshot: an
        // already-reversed purchase never reaches the network.
        if let Some(purchase) = feed.get(purchase_id) {
            validate_reversal(&purchase)?;
        }

        {
            let mut in_flight = self.in_flight.lock().expect("Reversal mutex poisoned");
            if !in_flight.insert(purchase_id.to_string()) {
                return Err(SessionError::RequestInFlight("reversal"));
            }
        }

        debug!(purchase_id = %purchase_id, "reversing purchase");
        let result = self.backend.reverse_purchase(purchase_id).await;

        self.in_flight
            .lock()
            .expect("Reversal mutex poisoned")
            .remove(purchase_id);

        match result {
            Ok(updated) => {
                feed.apply_update(&updated);
                info!(purchase_id = %purchase_id, "purchase reversed");
                self.emitter.notice_success("Purchase reversed successfully");
                Ok(())
            }
            Err(err) => {
                self.emitter
                    .notice_error(&format!("Failed to reverse purchase: {}", err));
                Err(err.into())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
