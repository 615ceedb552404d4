//! # Error Types
//!
//! Domain-specific error types for canteen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  canteen-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Local precondition failures (no network)       │
//! │                                                                         │
//! │  canteen-client errors (separate crate)                                │
//! │  └── BackendError     - Transport / server failures                    │
//! │                                                                         │
//! │  canteen-session errors (separate crate)                               │
//! │  └── SessionError     - What the UI layer sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → operator notice    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (purchase id, field name)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations caught before any network
/// traffic. They should be translated to user-friendly notices.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A purchase is already reversed; reversal is one-way.
    ///
    /// Rejected locally - the reversal coordinator never issues a second
    /// request for a purchase whose local flag is already set. The server
    /// independently enforces the same rule.
    #[error("Purchase {0} is already reversed")]
    AlreadyReversed(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Local precondition failures.
///
/// These occur before any request is composed; a violation makes zero
/// network calls and leaves all state untouched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The cart has no scan units; nothing to submit.
    #[error("Cart is empty")]
    EmptyCart,

    /// No customer is currently resolved for the session.
    #[error("No customer resolved for this purchase")]
    CustomerRequired,

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::AlreadyReversed("pur-42".to_string());
        assert_eq!(err.to_string(), "Purchase pur-42 is already reversed");

        let err = ValidationError::EmptyCart;
        assert_eq!(err.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::CustomerRequired;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
