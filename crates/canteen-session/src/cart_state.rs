//! # Cart State
//!
//! Shared handle over the pure [`CartEngine`].
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because coordinators and the UI
//! layer hold the same cart, and only one may mutate it at a time. Cart
//! mutations are synchronous - no lock is ever held across an await point,
//! so adds and removes are always ordered by the sequence of operator
//! actions.

use std::sync::{Arc, Mutex};

use canteen_core::cart::CartEngine;

/// Shared cart state for one POS session.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<CartEngine>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(CartEngine::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let payload = cart_state.with_cart(|cart| cart.to_aggregated_payload());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartEngine) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&product));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartEngine) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}
