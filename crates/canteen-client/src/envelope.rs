//! # Response Envelope
//!
//! Every canteen server endpoint wraps its payload in the same shape:
//!
//! ```json
//! { "success": true, "data": ..., "message": "optional human text" }
//! ```
//!
//! `success: false` carries the server's rejection message; `data` may be
//! `null` on responses like a face match that found nobody.

use serde::Deserialize;

use crate::error::BackendError;

/// The `{ success, data, message }` wrapper used by all endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Whether the server accepted the operation.
    pub success: bool,

    /// Payload; absent or null on failures and empty matches.
    #[serde(default = "Option::default")]
    pub data: Option<T>,

    /// Human-readable message, mainly on failures.
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwraps the envelope into the payload.
    ///
    /// `success: false` becomes [`BackendError::Server`]; a successful
    /// response with no data becomes `Ok(None)` (the caller decides whether
    /// "nothing" is an error - for a face match it is a NotFound outcome,
    /// not a failure).
    pub fn into_data(self) -> Result<Option<T>, BackendError> {
        if !self.success {
            return Err(BackendError::Server {
                message: self
                    .message
                    .unwrap_or_else(|| "Request rejected by server".to_string()),
            });
        }
        Ok(self.data)
    }

    /// Unwraps an envelope whose payload is required on success.
    pub fn into_required_data(self, what: &str) -> Result<T, BackendError> {
        let what = what.to_string();
        self.into_data()?
            .ok_or(BackendError::MissingData { what })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canteen_core::types::Customer;

    #[test]
    fn test_success_with_data() {
        let json = r#"{"success":true,"data":{"id":"c1","displayName":"Asha Rao","registrationNumber":"STU001"}}"#;
        let envelope: Envelope<Customer> = serde_json::from_str(json).unwrap();
        let customer = envelope.into_required_data("customer").unwrap();
        assert_eq!(customer.registration_number, "STU001");
    }

    #[test]
    fn test_success_with_null_data_is_none() {
        let json = r#"{"success":true,"data":null,"message":"Student not found"}"#;
        let envelope: Envelope<Customer> = serde_json::from_str(json).unwrap();
        assert!(envelope.into_data().unwrap().is_none());
    }

    #[test]
    fn test_failure_carries_server_message() {
        let json = r#"{"success":false,"message":"Insufficient balance"}"#;
        let envelope: Envelope<Customer> = serde_json::from_str(json).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.to_string(), "Server rejected request: Insufficient balance");
    }
}
