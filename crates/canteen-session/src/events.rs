//! # Operator Event Emitter
//!
//! Trait for surfacing user-visible notices (implemented by the UI
//! integration). Every failure path in the engine ends in exactly one
//! notice here; none is fatal to the session.

use tracing::{error, info, warn};

/// Trait for emitting operator-facing events.
pub trait PosEventEmitter: Send + Sync {
    /// A completed action worth confirming ("Purchase processed").
    fn notice_success(&self, message: &str);

    /// A non-fatal outcome ("Student not found").
    fn notice_warning(&self, message: &str);

    /// A transient failure; the operator may re-trigger the action.
    fn notice_error(&self, message: &str);

    /// The face-capture surface should close (match attempt completed).
    fn face_capture_closed(&self);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl PosEventEmitter for NoOpEmitter {
    fn notice_success(&self, _message: &str) {}
    fn notice_warning(&self, _message: &str) {}
    fn notice_error(&self, _message: &str) {}
    fn face_capture_closed(&self) {}
}

/// Emitter that forwards notices to tracing (headless runs, demos).
pub struct TracingEmitter;

impl PosEventEmitter for TracingEmitter {
    fn notice_success(&self, message: &str) {
        info!(notice = %message, "operator notice");
    }

    fn notice_warning(&self, message: &str) {
        warn!(notice = %message, "operator notice");
    }

    fn notice_error(&self, message: &str) {
        error!(notice = %message, "operator notice");
    }

    fn face_capture_closed(&self) {
        info!("face capture closed");
    }
}
