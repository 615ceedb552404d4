//! # Recent Purchase Feed
//!
//! Holds the recent-transactions snapshot the operator sees at the top of
//! the POS screen.
//!
//! - `refresh()` bumps a monotonically increasing token and re-fetches the
//!   list; it never mutates server state.
//! - `filtered()` is a pure local computation over the last snapshot plus
//!   the current filter text; it never triggers network calls.
//! - A failed refresh keeps the previous snapshot so the filter keeps
//!   operating on the last good data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use canteen_client::Backend;
use canteen_core::types::Purchase;

use crate::error::SessionResult;
use crate::events::PosEventEmitter;

/// Recent purchases for one POS session.
pub struct RecentPurchaseFeed {
    backend: Arc<dyn Backend>,
    emitter: Arc<dyn PosEventEmitter>,

    /// Bumped on every refresh request; observers re-render when it moves.
    refresh_token: AtomicU64,

    /// Last successfully fetched purchase list.
    snapshot: Mutex<Vec<Purchase>>,
}

impl RecentPurchaseFeed {
    pub fn new(backend: Arc<dyn Backend>, emitter: Arc<dyn PosEventEmitter>) -> Self {
        RecentPurchaseFeed {
            backend,
            emitter,
            refresh_token: AtomicU64::new(0),
            snapshot: Mutex::new(Vec::new()),
        }
    }

    /// Current refresh token. Monotonically increasing.
    pub fn refresh_token(&self) -> u64 {
        self.refresh_token.load(Ordering::SeqCst)
    }

    /// Re-fetches the purchase list. Read-only on the server.
    ///
    /// Returns the number of purchases fetched. On failure the previous
    /// snapshot is kept; the token still moves so a later manual refresh
    /// is never suppressed.
    pub async fn refresh(&self) -> SessionResult<usize> {
        let token = self.refresh_token.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, "refreshing recent purchases");

        match self.backend.list_purchases().await {
            Ok(purchases) => {
                let count = purchases.len();
                *self.snapshot.lock().expect("Feed mutex poisoned") = purchases;
                Ok(count)
            }
            Err(err) => {
                self.emitter
                    .notice_error(&format!("Error loading purchases: {}", err));
                Err(err.into())
            }
        }
    }

    /// The last fetched snapshot, unfiltered.
    pub fn snapshot(&self) -> Vec<Purchase> {
        self.snapshot.lock().expect("Feed mutex poisoned").clone()
    }

    /// Pure local filter by customer display name or registration-number
    /// substring, case-insensitive. Blank filter returns everything.
    pub fn filtered(&self, filter: &str) -> Vec<Purchase> {
        let needle = filter.trim().to_lowercase();
        let snapshot = self.snapshot.lock().expect("Feed mutex poisoned");

        if needle.is_empty() {
            return snapshot.clone();
        }

        snapshot
            .iter()
            .filter(|p| {
                p.customer.registration_number.to_lowercase().contains(&needle)
                    || p.customer.display_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Looks up one purchase in the snapshot.
    pub fn get(&self, purchase_id: &str) -> Option<Purchase> {
        self.snapshot
            .lock()
            .expect("Feed mutex poisoned")
            .iter()
            .find(|p| p.id == purchase_id)
            .cloned()
    }

    /// Applies a server-returned purchase to the snapshot (e.g. after a
    /// reversal), replacing the entry with the same id.
    pub fn apply_update(&self, updated: &Purchase) {
        let mut snapshot = self.snapshot.lock().expect("Feed mutex poisoned");
        if let Some(entry) = snapshot.iter_mut().find(|p| p.id == updated.id) {
            *entry = updated.clone();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
