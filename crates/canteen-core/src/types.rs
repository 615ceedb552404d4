//! # Domain Types
//!
//! Core domain types used throughout Canteen POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │    Purchase     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  display_name   │   │  customer       │       │
//! │  │  unit_price     │   │  registration # │   │  lines          │       │
//! │  │  stock_quantity │   └─────────────────┘   │  total (server) │       │
//! │  └─────────────────┘                         │  reversed       │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐                            │
//! │  │ FaceDescriptor  │   │  PurchaseLine   │                            │
//! │  │  opaque f32 vec │   │  product × qty  │                            │
//! │  └─────────────────┘   └─────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Discipline
//! `Product` is an immutable snapshot of the catalog: the client never
//! mutates price or stock locally. `Purchase.total_amount_cents` is whatever
//! the server returned - the client treats it as authoritative and only
//! computes advisory display totals before submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Product
// =============================================================================

/// A catalog item available for sale at the tuck shop.
///
/// Fetched from `GET /items`; held as a read-only snapshot. Stock is
/// display-only - the server owns all stock math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown to the operator.
    pub name: String,

    /// Unit price in cents (smallest currency unit).
    pub unit_price_cents: i64,

    /// Current stock level as last reported by the server.
    pub stock_quantity: i64,
}

// =============================================================================
// Customer
// =============================================================================

/// A student who can be charged for a purchase.
///
/// At most one customer may be "resolved" at a time per POS session; see
/// the identity resolver in `canteen-session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    /// Unique identifier.
    pub id: String,

    /// Full display name.
    pub display_name: String,

    /// Human-readable registration number (e.g. "STU001").
    pub registration_number: String,
}

// =============================================================================
// Face Descriptor
// =============================================================================

/// An opaque biometric feature vector produced by the capture device.
///
/// The engine never interprets the values; it forwards them verbatim to
/// `POST /customers/fetch-by-face`. One descriptor is presented per capture
/// attempt, though the device may emit the same attempt more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct FaceDescriptor(pub Vec<f32>);

impl FaceDescriptor {
    /// Returns the raw feature values.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Number of features in the vector.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the capture produced no features.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for FaceDescriptor {
    fn from(values: Vec<f32>) -> Self {
        FaceDescriptor(values)
    }
}

// =============================================================================
// Purchase Line
// =============================================================================

/// One aggregated product line: the shape sent in `POST /purchases` and
/// echoed back inside a [`Purchase`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseLine {
    /// Product being purchased.
    pub product_id: String,

    /// Net quantity (scan count) for that product.
    pub quantity: i64,
}

// =============================================================================
// Purchase
// =============================================================================

/// A purchase as returned by the server.
///
/// Created by the purchase coordinator, mutated only by the server
/// (total, reversed flag). `reversed` is monotonic: false → true, never
/// back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Purchase {
    /// Unique identifier.
    pub id: String,

    /// The charged customer, embedded by the server for display.
    pub customer: Customer,

    /// Aggregated product lines.
    pub lines: Vec<PurchaseLine>,

    /// Authoritative total in cents, computed server-side.
    pub total_amount_cents: i64,

    /// When the purchase was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Whether the purchase has been reversed (voided).
    pub reversed: bool,
}

impl Purchase {
    /// Id of the charged customer.
    pub fn customer_id(&self) -> &str {
        &self.customer.id
    }
}

// =============================================================================
// Create Purchase Request
// =============================================================================

/// Body of `POST /purchases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePurchaseRequest {
    /// The resolved customer to charge.
    pub customer_id: String,

    /// Aggregated cart payload, first-seen order.
    pub products: Vec<PurchaseLine>,

    /// Location the purchase is made at, when one is selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

// =============================================================================
// Location
// =============================================================================

/// A canteen location (one POS session serves exactly one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Location {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_line_wire_shape() {
        let line = PurchaseLine {
            product_id: "prod-1".to_string(),
            quantity: 3,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["productId"], "prod-1");
        assert_eq!(json["quantity"], 3);
    }

    #[test]
    fn test_face_descriptor_is_transparent() {
        let descriptor = FaceDescriptor(vec![0.25, -0.5]);
        let json = serde_json::to_string(&descriptor).unwrap();
        assert_eq!(json, "[0.25,-0.5]");
    }

    #[test]
    fn test_create_request_omits_missing_location() {
        let req = CreatePurchaseRequest {
            customer_id: "cust-1".to_string(),
            products: vec![],
            location_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("locationId").is_none());
    }
}
