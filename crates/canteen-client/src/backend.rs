//! # Backend Trait
//!
//! The single seam between the transaction engine and the canteen server.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Trait method              REST endpoint                                │
//! │  ────────────              ─────────────                                │
//! │  search_customer_exact ──► GET  /customers?exactData=<text>            │
//! │  fetch_customer_by_face ─► POST /customers/fetch-by-face               │
//! │  list_purchases ─────────► GET  /purchases                             │
//! │  create_purchase ────────► POST /purchases                             │
//! │  reverse_purchase ───────► POST /purchases/{id}/reverse                │
//! │  list_items ─────────────► GET  /items                                 │
//! │  list_locations ─────────► GET  /locations                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Nobody matched" is data, not an error: exact search returns an empty
//! vec and a face match returns `None`. [`BackendError`] is reserved for
//! transport and server failures.

use async_trait::async_trait;

use canteen_core::types::{
    CreatePurchaseRequest, Customer, FaceDescriptor, Location, Product, Purchase,
};

use crate::error::BackendResult;

/// Async interface to the canteen server.
///
/// Implemented by [`crate::HttpBackend`] for production and
/// [`crate::MockBackend`] for tests.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exact-match customer search for the typed identifier.
    async fn search_customer_exact(&self, exact: &str) -> BackendResult<Vec<Customer>>;

    /// Biometric match for one capture attempt. `None` means no match.
    async fn fetch_customer_by_face(
        &self,
        descriptor: &FaceDescriptor,
    ) -> BackendResult<Option<Customer>>;

    /// Recent purchases, newest first.
    async fn list_purchases(&self) -> BackendResult<Vec<Purchase>>;

    /// Creates a purchase; the returned total is authoritative.
    async fn create_purchase(&self, request: &CreatePurchaseRequest) -> BackendResult<Purchase>;

    /// Reverses a purchase exactly once; the server enforces idempotency.
    async fn reverse_purchase(&self, purchase_id: &str) -> BackendResult<Purchase>;

    /// Catalog snapshot for the item panel.
    async fn list_items(&self) -> BackendResult<Vec<Product>>;

    /// Canteen locations a session can be bound to.
    async fn list_locations(&self) -> BackendResult<Vec<Location>>;
}
