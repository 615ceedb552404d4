//! # Validation Module
//!
//! Local precondition checks for Canteen POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (pure, local)                                    │
//! │  ├── Empty cart, unresolved customer, already-reversed purchase        │
//! │  └── A violation makes ZERO network calls                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Server                                                       │
//! │  ├── Stock, balance, idempotency                                       │
//! │  └── Authoritative - client checks are a UX measure, not the           │
//! │      correctness guarantee                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, ValidationError};
use crate::types::{Purchase, PurchaseLine};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Submit Preconditions
// =============================================================================

/// Validates a purchase submission before any request is composed.
///
/// ## Rules
/// - Aggregated payload must be non-empty
/// - A customer id must be present (someone is currently resolved)
///
/// ## Example
/// ```rust
/// use canteen_core::types::PurchaseLine;
/// use canteen_core::validation::validate_submit;
///
/// let lines = vec![PurchaseLine { product_id: "A".into(), quantity: 2 }];
/// assert!(validate_submit(&lines, Some("cust-1")).is_ok());
/// assert!(validate_submit(&[], Some("cust-1")).is_err());
/// assert!(validate_submit(&lines, None).is_err());
/// ```
pub fn validate_submit(lines: &[PurchaseLine], customer_id: Option<&str>) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    match customer_id {
        None => Err(ValidationError::CustomerRequired),
        Some(id) if id.trim().is_empty() => Err(ValidationError::CustomerRequired),
        Some(_) => Ok(()),
    }
}

// =============================================================================
// Reversal Preconditions
// =============================================================================

/// Validates a reversal against the locally known purchase state.
///
/// A purchase whose local `reversed` flag is already set is rejected here,
/// before any network call. `reversed` is monotonic, so this check can
/// never go stale in the false→true direction.
pub fn validate_reversal(purchase: &Purchase) -> Result<(), CoreError> {
    if purchase.reversed {
        return Err(CoreError::AlreadyReversed(purchase.id.clone()));
    }
    Ok(())
}

// =============================================================================
// Search Input
// =============================================================================

/// Validates the exact-search query text.
///
/// Blank queries never reach the network; the resolver simply stays Idle.
pub fn validate_search_query(query: &str) -> ValidationResult<()> {
    if query.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "query".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Customer;
    use chrono::Utc;

    fn line(id: &str, quantity: i64) -> PurchaseLine {
        PurchaseLine {
            product_id: id.to_string(),
            quantity,
        }
    }

    fn purchase(id: &str, reversed: bool) -> Purchase {
        Purchase {
            id: id.to_string(),
            customer: Customer {
                id: "cust-1".to_string(),
                display_name: "Asha Rao".to_string(),
                registration_number: "STU001".to_string(),
            },
            lines: vec![line("A", 1)],
            total_amount_cents: 500,
            created_at: Utc::now(),
            reversed,
        }
    }

    #[test]
    fn test_submit_requires_nonempty_cart() {
        let err = validate_submit(&[], Some("cust-1")).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyCart));
    }

    #[test]
    fn test_submit_requires_customer() {
        let lines = vec![line("A", 2)];
        let err = validate_submit(&lines, None).unwrap_err();
        assert!(matches!(err, ValidationError::CustomerRequired));

        let err = validate_submit(&lines, Some("  ")).unwrap_err();
        assert!(matches!(err, ValidationError::CustomerRequired));
    }

    #[test]
    fn test_submit_accepts_valid_input() {
        let lines = vec![line("A", 2), line("B", 1)];
        assert!(validate_submit(&lines, Some("cust-1")).is_ok());
    }

    #[test]
    fn test_reversal_rejects_already_reversed() {
        let err = validate_reversal(&purchase("pur-1", true)).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyReversed(_)));

        assert!(validate_reversal(&purchase("pur-2", false)).is_ok());
    }

    #[test]
    fn test_blank_query_rejected() {
        assert!(validate_search_query("").is_err());
        assert!(validate_search_query("   ").is_err());
        assert!(validate_search_query("STU001").is_ok());
    }
}
