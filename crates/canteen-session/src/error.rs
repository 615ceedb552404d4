//! # Session Error Type
//!
//! Unified error type the UI layer sees.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Error Flow in Canteen POS                             │
//! │                                                                         │
//! │  Validation (local) ── empty cart, no customer ──► zero network calls  │
//! │  Conflict (local) ──── already-reversed purchase ► zero network calls  │
//! │  InFlight (local) ──── duplicate submit/reverse ─► zero network calls  │
//! │  Backend ───────────── transport/server failure ─► state unchanged     │
//! │                                                                         │
//! │  Every error is surfaced as a transient operator notice and returns    │
//! │  the component to a stable, re-usable state. Nothing is retried        │
//! │  automatically - the operator re-triggers the action.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use canteen_client::BackendError;
use canteen_core::error::{CoreError, ValidationError};

/// Errors surfaced by the session coordinators.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Local precondition failure; no request was composed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Business rule violation caught locally (e.g. already reversed).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The same kind of request is already outstanding for this target.
    ///
    /// Stands in for the disabled control in the UI: one submit at a time,
    /// one reversal per purchase id at a time.
    #[error("A {0} request is already in flight")]
    RequestInFlight(&'static str),

    /// Transport or server failure; the triggering state is unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A location id was selected that is not in the loaded directory.
    #[error("Unknown location: {0}")]
    UnknownLocation(String),
}

impl SessionError {
    /// True when the error was produced locally, before any network call.
    pub fn is_local(&self) -> bool {
        !matches!(self, SessionError::Backend(_))
    }
}

/// Convenience type alias for Results with SessionError.
pub type SessionResult<T> = Result<T, SessionError>;
