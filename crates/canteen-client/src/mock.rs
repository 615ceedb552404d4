//! # Mock Backend
//!
//! In-memory [`Backend`] for tests: scripted responses, per-route call
//! counters, optional artificial latency so a request can be held
//! "outstanding" under tokio's paused clock.
//!
//! Counters are the yardstick the engine's ordering guarantees are tested
//! against - e.g. "four keystrokes inside one quiet period issue exactly
//! one search request" is `search_calls() == 1`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use canteen_core::types::{
    CreatePurchaseRequest, Customer, FaceDescriptor, Location, Product, Purchase,
};

use crate::backend::Backend;
use crate::error::{BackendError, BackendResult};

/// Scripted in-memory backend.
///
/// State lives behind `std::sync::Mutex` - every lock is released before
/// any await point, so the mock stays deadlock-free on a current-thread
/// test runtime.
#[derive(Debug, Default)]
pub struct MockBackend {
    customers: Mutex<Vec<Customer>>,
    face_match: Mutex<Option<Customer>>,
    items: Mutex<Vec<Product>>,
    purchases: Mutex<Vec<Purchase>>,
    locations: Mutex<Vec<Location>>,

    /// Artificial latency applied to every call (zero by default).
    latency: Mutex<Duration>,

    search_calls: AtomicUsize,
    face_calls: AtomicUsize,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    reverse_calls: AtomicUsize,
    item_calls: AtomicUsize,
    location_calls: AtomicUsize,

    fail_search: AtomicBool,
    fail_face: AtomicBool,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    fail_reverse: AtomicBool,

    /// Queries the exact search actually received, in order.
    search_queries: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Creates an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Scripting
    // -------------------------------------------------------------------------

    /// Seeds the customers returned by exact search (matched on
    /// registration number or id).
    pub fn with_customers(self, customers: Vec<Customer>) -> Self {
        *self.customers.lock().expect("mock mutex poisoned") = customers;
        self
    }

    /// Seeds the customer returned by a face match.
    pub fn with_face_match(self, customer: Option<Customer>) -> Self {
        *self.face_match.lock().expect("mock mutex poisoned") = customer;
        self
    }

    /// Seeds the catalog.
    pub fn with_items(self, items: Vec<Product>) -> Self {
        *self.items.lock().expect("mock mutex poisoned") = items;
        self
    }

    /// Seeds the purchase list.
    pub fn with_purchases(self, purchases: Vec<Purchase>) -> Self {
        *self.purchases.lock().expect("mock mutex poisoned") = purchases;
        self
    }

    /// Seeds the locations list.
    pub fn with_locations(self, locations: Vec<Location>) -> Self {
        *self.locations.lock().expect("mock mutex poisoned") = locations;
        self
    }

    /// Applies an artificial latency to every call.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().expect("mock mutex poisoned") = latency;
        self
    }

    /// Makes the named routes fail with a transport error.
    pub fn fail_search(&self, fail: bool) {
        self.fail_search.store(fail, Ordering::SeqCst);
    }
    pub fn fail_face(&self, fail: bool) {
        self.fail_face.store(fail, Ordering::SeqCst);
    }
    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }
    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }
    pub fn fail_reverse(&self, fail: bool) {
        self.fail_reverse.store(fail, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Observations
    // -------------------------------------------------------------------------

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
    pub fn face_calls(&self) -> usize {
        self.face_calls.load(Ordering::SeqCst)
    }
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }
    pub fn item_calls(&self) -> usize {
        self.item_calls.load(Ordering::SeqCst)
    }
    pub fn location_calls(&self) -> usize {
        self.location_calls.load(Ordering::SeqCst)
    }

    /// Queries the exact search received, in arrival order.
    pub fn received_queries(&self) -> Vec<String> {
        self.search_queries
            .lock()
            .expect("mock mutex poisoned")
            .clone()
    }

    /// Current purchase list, including mutations made through the mock.
    pub fn stored_purchases(&self) -> Vec<Purchase> {
        self.purchases.lock().expect("mock mutex poisoned").clone()
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().expect("mock mutex poisoned");
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn transport_error(route: &str) -> BackendError {
        BackendError::Transport(format!("simulated outage on {}", route))
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn search_customer_exact(&self, exact: &str) -> BackendResult<Vec<Customer>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_queries
            .lock()
            .expect("mock mutex poisoned")
            .push(exact.to_string());
        self.simulate_latency().await;

        if self.fail_search.load(Ordering::SeqCst) {
            return Err(Self::transport_error("search"));
        }

        let customers = self.customers.lock().expect("mock mutex poisoned");
        Ok(customers
            .iter()
            .filter(|c| c.registration_number == exact || c.id == exact)
            .cloned()
            .collect())
    }

    async fn fetch_customer_by_face(
        &self,
        _descriptor: &FaceDescriptor,
    ) -> BackendResult<Option<Customer>> {
        self.face_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.fail_face.load(Ordering::SeqCst) {
            return Err(Self::transport_error("fetch-by-face"));
        }

        Ok(self.face_match.lock().expect("mock mutex poisoned").clone())
    }

    async fn list_purchases(&self) -> BackendResult<Vec<Purchase>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::transport_error("purchases"));
        }

        Ok(self.purchases.lock().expect("mock mutex poisoned").clone())
    }

    async fn create_purchase(&self, request: &CreatePurchaseRequest) -> BackendResult<Purchase> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::transport_error("create purchase"));
        }

        let customer = self
            .customers
            .lock()
            .expect("mock mutex poisoned")
            .iter()
            .find(|c| c.id == request.customer_id)
            .cloned()
            .unwrap_or_else(|| Customer {
                id: request.customer_id.clone(),
                display_name: String::new(),
                registration_number: String::new(),
            });

        // Server-side total: unit price × quantity over the catalog.
        let total = {
            let items = self.items.lock().expect("mock mutex poisoned");
            request
                .products
                .iter()
                .map(|line| {
                    items
                        .iter()
                        .find(|p| p.id == line.product_id)
                        .map(|p| p.unit_price_cents * line.quantity)
                        .unwrap_or(0)
                })
                .sum()
        };

        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            customer,
            lines: request.products.clone(),
            total_amount_cents: total,
            created_at: Utc::now(),
            reversed: false,
        };

        self.purchases
            .lock()
            .expect("mock mutex poisoned")
            .insert(0, purchase.clone());

        Ok(purchase)
    }

    async fn reverse_purchase(&self, purchase_id: &str) -> BackendResult<Purchase> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.fail_reverse.load(Ordering::SeqCst) {
            return Err(Self::transport_error("reverse"));
        }

        let mut purchases = self.purchases.lock().expect("mock mutex poisoned");
        let purchase = purchases
            .iter_mut()
            .find(|p| p.id == purchase_id)
            .ok_or_else(|| BackendError::Server {
                message: format!("Purchase {} not found", purchase_id),
            })?;

        // Server enforces reverse-once independent of client guards.
        if purchase.reversed {
            return Err(BackendError::Server {
                message: format!("Purchase {} is already reversed", purchase_id),
            });
        }

        purchase.reversed = true;
        Ok(purchase.clone())
    }

    async fn list_items(&self) -> BackendResult<Vec<Product>> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        Ok(self.items.lock().expect("mock mutex poisoned").clone())
    }

    async fn list_locations(&self) -> BackendResult<Vec<Location>> {
        self.location_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        Ok(self.locations.lock().expect("mock mutex poisoned").clone())
    }
}
