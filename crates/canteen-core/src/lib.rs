//! # canteen-core: Pure Business Logic for Canteen POS
//!
//! This crate is the **heart** of the Canteen POS transaction engine. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Canteen POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (TypeScript)                        │   │
//! │  │    Scan UI ──► Student Search ──► Face Capture ──► Feed        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    canteen-session                              │   │
//! │  │    resolver, purchase, reversal, feed coordinators              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ canteen-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │   error   │  │ validation│  │   │
//! │  │   │  Product  │  │CartEngine │  │ CoreError │  │   rules   │  │   │
//! │  │   │  Customer │  │ CartScan  │  │Validation │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 canteen-client (Backend trait)                  │   │
//! │  │          REST calls to the canteen server (reqwest)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Purchase, etc.)
//! - [`cart`] - Scan-event cart with first-seen-ordered aggregation
//! - [`error`] - Domain error types
//! - [`validation`] - Local precondition checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, timers, file system access is FORBIDDEN here
//! 3. **Server Totals**: Money the client shows is advisory; money that
//!    persists comes back from the server
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use canteen_core::cart::CartEngine;
//! use canteen_core::types::Product;
//!
//! let coke = Product {
//!     id: "A".into(),
//!     name: "Cola 330ml".into(),
//!     unit_price_cents: 500,
//!     stock_quantity: 24,
//! };
//!
//! let mut cart = CartEngine::new();
//! cart.add_item(&coke);
//! cart.add_item(&coke);
//!
//! let payload = cart.to_aggregated_payload();
//! assert_eq!(payload[0].quantity, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use canteen_core::CartEngine` instead of
// `use canteen_core::cart::CartEngine`

pub use cart::{CartEngine, CartScan};
pub use error::{CoreError, ValidationError};
pub use types::*;
