//! # Catalog Snapshot
//!
//! The "Available Items" panel data: a read-only snapshot of the tuck-shop
//! catalog. Products are immutable once fetched - the client never mutates
//! price or stock locally; a reload replaces the whole snapshot.

use std::sync::{Arc, Mutex};

use tracing::debug;

use canteen_client::Backend;
use canteen_core::types::Product;

use crate::error::SessionResult;
use crate::events::PosEventEmitter;

/// Catalog snapshot for one POS session.
pub struct Catalog {
    backend: Arc<dyn Backend>,
    emitter: Arc<dyn PosEventEmitter>,
    items: Mutex<Vec<Product>>,
}

impl Catalog {
    pub fn new(backend: Arc<dyn Backend>, emitter: Arc<dyn PosEventEmitter>) -> Self {
        Catalog {
            backend,
            emitter,
            items: Mutex::new(Vec::new()),
        }
    }

    /// Fetches the current item list, replacing the snapshot.
    pub async fn load(&self) -> SessionResult<usize> {
        match self.backend.list_items().await {
            Ok(items) => {
                let count = items.len();
                debug!(count, "catalog loaded");
                *self.items.lock().expect("Catalog mutex poisoned") = items;
                Ok(count)
            }
            Err(err) => {
                self.emitter
                    .notice_error(&format!("Failed to load items: {}", err));
                Err(err.into())
            }
        }
    }

    /// The current snapshot.
    pub fn items(&self) -> Vec<Product> {
        self.items.lock().expect("Catalog mutex poisoned").clone()
    }

    /// Looks one product up by id.
    pub fn get(&self, product_id: &str) -> Option<Product> {
        self.items
            .lock()
            .expect("Catalog mutex poisoned")
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
    }
}
