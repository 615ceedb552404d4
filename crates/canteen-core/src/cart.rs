//! # Cart Engine
//!
//! Accumulates scan events and derives the aggregated purchase payload.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cart Engine Operations                              │
//! │                                                                         │
//! │  Operator Action           Engine Call              State Change        │
//! │  ───────────────           ───────────              ────────────        │
//! │                                                                         │
//! │  Scan / click item ──────► add_item(product) ─────► scans.push(unit)   │
//! │                                                                         │
//! │  Remove one unit ────────► remove_one(id) ────────► first match gone   │
//! │                                                                         │
//! │  Process purchase ───────► to_aggregated_payload ─► (read only)        │
//! │                                                                         │
//! │  Purchase succeeded ─────► clear() ───────────────► scans.clear()      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Aggregation Contract
//! Each `add_item` records ONE scan unit; quantity for a product is the
//! number of its surviving scans. `to_aggregated_payload` is a pure function
//! of the current scan sequence: one line per distinct product, ordered by
//! first appearance in the scan log (never sorted by id), quantities never
//! negative, zero-quantity products omitted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Product, PurchaseLine};

/// One accepted scan unit.
///
/// Carries a frozen snapshot of the product's display fields so the cart
/// renders consistently even if the catalog refreshes underneath it. The
/// price here is advisory only; the server computes the persisted total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartScan {
    /// Product ID (catalog reference).
    pub product_id: String,

    /// Product name at time of scanning (frozen).
    pub name: String,

    /// Unit price in cents at time of scanning (frozen, advisory).
    pub unit_price_cents: i64,

    /// When this unit was scanned.
    pub scanned_at: DateTime<Utc>,
}

impl CartScan {
    /// Snapshots a product into one scan unit.
    pub fn from_product(product: &Product) -> Self {
        CartScan {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.unit_price_cents,
            scanned_at: Utc::now(),
        }
    }
}

/// The cart: an ordered log of scan units.
///
/// ## Invariants
/// - Quantity per product = accepted adds − removes for it, never negative
///   (a remove with no matching scan is a silent no-op).
/// - Aggregation order is first-seen order of products in the scan log.
/// - Mutations are synchronous; no suspension point ever interleaves a
///   half-applied cart change with async work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEngine {
    /// Scan units in the order the operator produced them.
    scans: Vec<CartScan>,
}

impl CartEngine {
    /// Creates an empty cart.
    pub fn new() -> Self {
        CartEngine { scans: Vec::new() }
    }

    /// Appends one scan unit for the product. No precondition.
    pub fn add_item(&mut self, product: &Product) {
        self.scans.push(CartScan::from_product(product));
    }

    /// Removes one unit matching `product_id`, if any.
    ///
    /// Removes the earliest matching scan, mirroring how the operator's
    /// cart list is displayed. Silent no-op when the product has no scans.
    pub fn remove_one(&mut self, product_id: &str) {
        if let Some(idx) = self.scans.iter().position(|s| s.product_id == product_id) {
            self.scans.remove(idx);
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.scans.clear();
    }

    /// Derives the aggregated purchase payload.
    ///
    /// One `{productId, quantity}` line per distinct product, quantity =
    /// surviving scan count, ordered by first appearance in the scan log.
    pub fn to_aggregated_payload(&self) -> Vec<PurchaseLine> {
        let mut lines: Vec<PurchaseLine> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for scan in &self.scans {
            match index.get(scan.product_id.as_str()) {
                Some(&i) => lines[i].quantity += 1,
                None => {
                    index.insert(scan.product_id.as_str(), lines.len());
                    lines.push(PurchaseLine {
                        product_id: scan.product_id.clone(),
                        quantity: 1,
                    });
                }
            }
        }

        lines
    }

    /// The scan units, in operator order.
    pub fn scans(&self) -> &[CartScan] {
        &self.scans
    }

    /// Total number of scan units in the cart.
    pub fn len(&self) -> usize {
        self.scans.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// Number of distinct products in the cart.
    pub fn distinct_count(&self) -> usize {
        self.to_aggregated_payload().len()
    }

    /// Advisory total in cents, for display before submission only.
    ///
    /// The server's returned total is authoritative; this value is never
    /// sent with the purchase request.
    pub fn advisory_total_cents(&self) -> i64 {
        self.scans.iter().map(|s| s.unit_price_cents).sum()
    }
}
