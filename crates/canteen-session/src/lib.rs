//! # Canteen Session
//!
//! Stateful orchestration for one POS terminal session. Everything here
//! composes the pure logic from `canteen-core` with the `canteen-client`
//! backend seam and adds the concurrency discipline around it.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         canteen-session                                 │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌─────────────────────────┐ │
//! │  │  CartState   │   │ IdentityResolver │   │   RecentPurchaseFeed    │ │
//! │  │ (scan order) │   │ (debounce + face │   │ (refresh token + local  │ │
//! │  │              │   │  single-flight)  │   │  filter + updates)      │ │
//! │  └──────┬───────┘   └────────┬─────────┘   └───────────┬─────────────┘ │
//! │         │                    │                         │               │
//! │         ▼                    ▼                         ▼               │
//! │  ┌─────────────────────────────────┐   ┌─────────────────────────────┐ │
//! │  │      PurchaseCoordinator        │   │    ReversalCoordinator      │ │
//! │  │  (validate → guard → submit)    │   │  (conflict check → guard)   │ │
//! │  └─────────────────────────────────┘   └─────────────────────────────┘ │
//! │                                                                         │
//! │                        PosSession (composition root)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Rules
//!
//! - `std::sync::Mutex` guards are never held across an `.await`.
//! - Every network call runs behind an in-flight guard; duplicates are
//!   rejected, never queued.
//! - Background tasks re-check liveness and generation before applying
//!   their results, so stale completions are discarded silently.

pub mod cart_state;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod feed;
pub mod purchase;
pub mod resolver;
pub mod reversal;
pub mod session;

#[cfg(test)]
pub mod testing;

pub use cart_state::CartState;
pub use catalog::Catalog;
pub use config::{LocationDirectory, SessionConfig, DEFAULT_DEBOUNCE_MS};
pub use error::{SessionError, SessionResult};
pub use events::{NoOpEmitter, PosEventEmitter, TracingEmitter};
pub use feed::RecentPurchaseFeed;
pub use purchase::PurchaseCoordinator;
pub use resolver::{IdentityResolver, ResolverState};
pub use reversal::ReversalCoordinator;
pub use session::PosSession;
