//! Shared fixtures for the session tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use canteen_core::types::{Customer, Product, Purchase, PurchaseLine};

use crate::events::PosEventEmitter;

pub fn customer(id: &str, registration: &str) -> Customer {
    Customer {
        id: id.to_string(),
        display_name: format!("Student {}", id),
        registration_number: registration.to_string(),
    }
}

pub fn product(id: &str, price_cents: i64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Item {}", id),
        unit_price_cents: price_cents,
        stock_quantity: 10,
    }
}

pub fn purchase(id: &str, customer: &Customer, reversed: bool) -> Purchase {
    Purchase {
        id: id.to_string(),
        customer: customer.clone(),
        lines: vec![PurchaseLine {
            product_id: "A".to_string(),
            quantity: 1,
        }],
        total_amount_cents: 500,
        created_at: Utc::now(),
        reversed,
    }
}

/// Emitter that records every notice for assertions.
#[derive(Default)]
pub struct RecordingEmitter {
    successes: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    capture_closed: AtomicUsize,
}

impl RecordingEmitter {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().expect("emitter poisoned").clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("emitter poisoned").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("emitter poisoned").clone()
    }

    pub fn capture_closed_count(&self) -> usize {
        self.capture_closed.load(Ordering::SeqCst)
    }
}

impl PosEventEmitter for RecordingEmitter {
    fn notice_success(&self, message: &str) {
        self.successes
            .lock()
            .expect("emitter poisoned")
            .push(message.to_string());
    }

    fn notice_warning(&self, message: &str) {
        self.warnings
            .lock()
            .expect("emitter poisoned")
            .push(message.to_string());
    }

    fn notice_error(&self, message: &str) {
        self.errors
            .lock()
            .expect("emitter poisoned")
            .push(message.to_string());
    }

    fn face_capture_closed(&self) {
        self.capture_closed.fetch_add(1, Ordering::SeqCst);
    }
}
