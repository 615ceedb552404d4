//! # Identity Resolver
//!
//! Resolves the paying customer for the session, by typed identifier or by
//! face capture.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      IdentityResolver States                            │
//! │                                                                         │
//! │  Text path:   Idle ──► Searching(query) ──► Resolved | NotFound        │
//! │  Face path:   Idle ──► Capturing ──► Matching ──► Resolved | NotFound  │
//! │                                                                         │
//! │  Resolved / NotFound return to Idle on the next input.                 │
//! │  Any transport failure also returns to Idle (non-fatal).               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Guarantees
//! - **Debounce**: a lookup is issued only after one quiet period with no
//!   further keystrokes; a newer keystroke supersedes the pending one, so at
//!   most one request goes out per quiet period. A response whose
//!   originating query no longer matches the latest input is discarded
//!   silently.
//! - **Single-flight**: at most one resolution request (text or face) is
//!   outstanding at any time. Duplicate face-descriptor events while a match
//!   is outstanding are dropped entirely - no new request, no state change.
//! - **Liveness**: completions check the session's liveness flag before
//!   applying any result; a torn-down session drops them on the floor.
//!
//! The guards are plain atomics checked-and-set inside the event call
//! itself, before any suspension point, so they are race-free under the
//! cooperative scheduling model (and cheap under real threads too).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use canteen_client::Backend;
use canteen_core::types::{Customer, FaceDescriptor};

use crate::events::PosEventEmitter;

// =============================================================================
// Resolver State
// =============================================================================

/// Where the resolver currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverState {
    /// Nothing pending, nobody resolved.
    Idle,

    /// An exact search for `query` is outstanding.
    Searching { query: String },

    /// The face-capture surface is open, waiting for a descriptor.
    Capturing,

    /// A face-match request is outstanding.
    Matching,

    /// A customer is bound to the session.
    Resolved(Customer),

    /// The last attempt matched nobody (non-fatal).
    NotFound,
}

// =============================================================================
// Shared Internals
// =============================================================================

#[derive(Debug)]
struct ResolverShared {
    /// Bumped on every keystroke; a pending or in-flight search whose
    /// generation no longer matches is superseded.
    query_gen: AtomicU64,

    /// Single-flight guard: true while any resolution request (text or
    /// face) is outstanding.
    in_flight: AtomicBool,

    /// Cleared on session teardown; completions must check it before
    /// applying any result.
    alive: AtomicBool,

    state: Mutex<ResolverState>,
}

impl ResolverShared {
    fn set_state(&self, next: ResolverState) {
        *self.state.lock().expect("Resolver mutex poisoned") = next;
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Identity Resolver
// =============================================================================

/// Resolves the current customer; one instance per POS session.
pub struct IdentityResolver {
    backend: Arc<dyn Backend>,
    emitter: Arc<dyn PosEventEmitter>,

    /// Quiet period after the last keystroke before a search is issued.
    debounce: Duration,

    shared: Arc<ResolverShared>,
}

impl IdentityResolver {
    /// Creates a resolver with the given debounce window.
    pub fn new(
        backend: Arc<dyn Backend>,
        emitter: Arc<dyn PosEventEmitter>,
        debounce: Duration,
    ) -> Self {
        IdentityResolver {
            backend,
            emitter,
            debounce,
            shared: Arc::new(ResolverShared {
                query_gen: AtomicU64::new(0),
                in_flight: AtomicBool::new(false),
                alive: AtomicBool::new(true),
                state: Mutex::new(ResolverState::Idle),
            }),
        }
    }

    /// Current state (cloned snapshot).
    pub fn state(&self) -> ResolverState {
        self.shared
            .state
            .lock()
            .expect("Resolver mutex poisoned")
            .clone()
    }

    /// The customer currently bound to the session, if any.
    pub fn resolved_customer(&self) -> Option<Customer> {
        match self.state() {
            ResolverState::Resolved(customer) => Some(customer),
            _ => None,
        }
    }

    /// Tears the resolver down: outstanding completions will not apply.
    pub fn shutdown(&self) {
        self.shared.alive.store(false, Ordering::SeqCst);
        debug!("identity resolver shut down");
    }

    // -------------------------------------------------------------------------
    // Text Path
    // -------------------------------------------------------------------------

    /// Feeds one keystroke's worth of input.
    ///
    /// Restarts the quiet-period timer. When the window elapses with no
    /// newer keystroke, exactly one exact-search request is issued for the
    /// final text. Blank input just returns the resolver to Idle.
    ///
    /// The returned handle completes when this keystroke's timer task is
    /// done (possibly having done nothing, if superseded).
    pub fn on_keystroke(&self, text: &str) -> JoinHandle<()> {
        let generation = self.shared.query_gen.fetch_add(1, Ordering::SeqCst) + 1;
        let query = text.trim().to_string();

        // Next input moves Resolved / NotFound back to Idle.
        {
            let mut state = self.shared.state.lock().expect("Resolver mutex poisoned");
            if matches!(*state, ResolverState::Resolved(_) | ResolverState::NotFound) {
                *state = ResolverState::Idle;
            }
        }

        let shared = Arc::clone(&self.shared);
        let backend = Arc::clone(&self.backend);
        let emitter = Arc::clone(&self.emitter);
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            // Superseded before the window elapsed: a newer keystroke owns
            // the quiet period now.
            if shared.query_gen.load(Ordering::SeqCst) != generation {
                return;
            }
            if !shared.is_alive() {
                return;
            }
            if query.is_empty() {
                shared.set_state(ResolverState::Idle);
                return;
            }
            if shared
                .in_flight
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                debug!(query = %query, "another resolution in flight, search dropped");
                return;
            }

            shared.set_state(ResolverState::Searching {
                query: query.clone(),
            });
            debug!(query = %query, "issuing exact customer search");

            let result = backend.search_customer_exact(&query).await;
            shared.in_flight.store(false, Ordering::SeqCst);

            if !shared.is_alive() {
                return;
            }
            if shared.query_gen.load(Ordering::SeqCst) != generation {
                debug!(query = %query, "discarding superseded search response");
                shared.set_state(ResolverState::Idle);
                return;
            }

            match result {
                Ok(hits) => match hits.into_iter().next() {
                    Some(customer) => {
                        info!(
                            customer_id = %customer.id,
                            registration = %customer.registration_number,
                            "customer resolved by search"
                        );
                        shared.set_state(ResolverState::Resolved(customer));
                    }
                    None => {
                        shared.set_state(ResolverState::NotFound);
                        emitter.notice_warning("Student not found");
                    }
                },
                Err(err) => {
                    warn!(query = %query, error = %err, "customer search failed");
                    shared.set_state(ResolverState::Idle);
                    emitter.notice_error(&format!("Student search failed: {}", err));
                }
            }
        })
    }

    // -------------------------------------------------------------------------
    // Face Path
    // -------------------------------------------------------------------------

    /// Marks the capture surface as open.
    pub fn begin_capture(&self) {
        if self.shared.is_alive() {
            self.shared.set_state(ResolverState::Capturing);
        }
    }

    /// Handles one descriptor event from the capture device.
    ///
    /// The device may emit the same attempt several times in quick
    /// succession; while a match request is outstanding every further event
    /// is ignored entirely. Returns `None` when the event was dropped by
    /// the single-flight guard (or the session is dead), `Some(handle)`
    /// when a match request was started. The outcome - resolved, not found,
    /// or error - is reported exactly once per started request, after which
    /// the capture surface is closed and the guard released.
    pub fn on_face_descriptor(&self, descriptor: FaceDescriptor) -> Option<JoinHandle<()>> {
        if !self.shared.is_alive() {
            return None;
        }
        if self
            .shared
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("duplicate descriptor ignored while match outstanding");
            return None;
        }

        self.shared.set_state(ResolverState::Matching);
        debug!(features = descriptor.len(), "issuing face match");

        let shared = Arc::clone(&self.shared);
        let backend = Arc::clone(&self.backend);
        let emitter = Arc::clone(&self.emitter);

        Some(tokio::spawn(async move {
            let result = backend.fetch_customer_by_face(&descriptor).await;

            if !shared.is_alive() {
                shared.in_flight.store(false, Ordering::SeqCst);
                return;
            }

            match result {
                Ok(Some(customer)) => {
                    info!(
                        customer_id = %customer.id,
                        registration = %customer.registration_number,
                        "customer resolved by face match"
                    );
                    emitter.notice_success(&format!("Resolved {}", customer.display_name));
                    shared.set_state(ResolverState::Resolved(customer));
                }
                Ok(None) => {
                    shared.set_state(ResolverState::NotFound);
                    emitter.notice_warning("Student not found");
                }
                Err(err) => {
                    warn!(error = %err, "face match failed");
                    shared.set_state(ResolverState::Idle);
                    emitter.notice_error(&format!("Face match failed: {}", err));
                }
            }

            emitter.face_capture_closed();
            shared.in_flight.store(false, Ordering::SeqCst);
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{customer, RecordingEmitter};
    use canteen_client::MockBackend;

    const DEBOUNCE: Duration = Duration::from_millis(400);

    fn resolver_with(
        mock: Arc<MockBackend>,
        emitter: Arc<RecordingEmitter>,
    ) -> IdentityResolver {
        IdentityResolver::new(mock, emitter, DEBOUNCE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_keystrokes_issue_one_search_for_final_query() {
        let mock = Arc::new(MockBackend::new().with_customers(vec![customer("c1", "STU001")]));
        let emitter = Arc::new(RecordingEmitter::default());
        let resolver = resolver_with(Arc::clone(&mock), emitter);

        let mut handles = Vec::new();
        for text in ["S", "ST", "STU0", "STU001"] {
            handles.push(resolver.on_keystroke(text));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(mock.search_calls(), 1);
        assert_eq!(mock.received_queries(), vec!["STU001".to_string()]);
        assert_eq!(
            resolver.resolved_customer().map(|c| c.registration_number),
            Some("STU001".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_response_is_discarded() {
        // Search stays outstanding for a full second; the operator keeps
        // typing while it is in flight.
        let mock = Arc::new(
            MockBackend::new()
                .with_customers(vec![customer("c1", "STU001")])
                .with_latency(Duration::from_secs(1)),
        );
        let emitter = Arc::new(RecordingEmitter::default());
        let resolver = resolver_with(Arc::clone(&mock), Arc::clone(&emitter));

        let first = resolver.on_keystroke("STU001");
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;
        assert_eq!(mock.search_calls(), 1);

        // A newer keystroke arrives while the STU001 request is in flight.
        let second = resolver.on_keystroke("STU002");

        first.await.unwrap();
        second.await.unwrap();

        // The STU001 response matched a customer but was superseded, so it
        // must not have been applied.
        assert_eq!(resolver.resolved_customer(), None);
        assert_eq!(resolver.state(), ResolverState::Idle);
        assert!(emitter.successes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_returns_to_idle_without_request() {
        let mock = Arc::new(MockBackend::new());
        let emitter = Arc::new(RecordingEmitter::default());
        let resolver = resolver_with(Arc::clone(&mock), emitter);

        resolver.on_keystroke("   ").await.unwrap();

        assert_eq!(mock.search_calls(), 0);
        assert_eq!(resolver.state(), ResolverState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_miss_reports_not_found_and_recovers() {
        let mock = Arc::new(MockBackend::new());
        let emitter = Arc::new(RecordingEmitter::default());
        let resolver = resolver_with(Arc::clone(&mock), Arc::clone(&emitter));

        resolver.on_keystroke("STU999").await.unwrap();

        assert_eq!(resolver.state(), ResolverState::NotFound);
        assert_eq!(emitter.warnings(), vec!["Student not found".to_string()]);

        // Next input moves the resolver off NotFound.
        let handle = resolver.on_keystroke("S");
        assert!(!matches!(resolver.state(), ResolverState::NotFound));
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_descriptor_events_issue_one_request() {
        let mock = Arc::new(
            MockBackend::new()
                .with_face_match(Some(customer("c1", "STU001")))
                .with_latency(Duration::from_millis(500)),
        );
        let emitter = Arc::new(RecordingEmitter::default());
        let resolver = resolver_with(Arc::clone(&mock), Arc::clone(&emitter));

        resolver.begin_capture();
        let descriptor = FaceDescriptor(vec![0.1, 0.2, 0.3]);

        let first = resolver.on_face_descriptor(descriptor.clone());
        let second = resolver.on_face_descriptor(descriptor.clone());
        let third = resolver.on_face_descriptor(descriptor);

        assert!(first.is_some());
        assert!(second.is_none());
        assert!(third.is_none());

        first.unwrap().await.unwrap();

        assert_eq!(mock.face_calls(), 1);
        assert!(resolver.resolved_customer().is_some());
        assert_eq!(emitter.capture_closed_count(), 1);
        assert_eq!(emitter.successes().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_releases_after_completion() {
        let mock = Arc::new(MockBackend::new().with_face_match(None));
        let emitter = Arc::new(RecordingEmitter::default());
        let resolver = resolver_with(Arc::clone(&mock), Arc::clone(&emitter));

        let descriptor = FaceDescriptor(vec![0.5]);

        let first = resolver.on_face_descriptor(descriptor.clone()).unwrap();
        first.await.unwrap();
        assert_eq!(resolver.state(), ResolverState::NotFound);

        // A fresh capture attempt after completion is accepted again.
        let second = resolver.on_face_descriptor(descriptor);
        assert!(second.is_some());
        second.unwrap().await.unwrap();

        assert_eq!(mock.face_calls(), 2);
        assert_eq!(emitter.capture_closed_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_face_error_returns_to_idle() {
        let mock = Arc::new(MockBackend::new());
        mock.fail_face(true);
        let emitter = Arc::new(RecordingEmitter::default());
        let resolver = resolver_with(Arc::clone(&mock), Arc::clone(&emitter));

        let handle = resolver.on_face_descriptor(FaceDescriptor(vec![0.5])).unwrap();
        handle.await.unwrap();

        assert_eq!(resolver.state(), ResolverState::Idle);
        assert_eq!(emitter.errors().len(), 1);
        assert_eq!(emitter.capture_closed_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_drops_outstanding_result() {
        let mock = Arc::new(
            MockBackend::new()
                .with_face_match(Some(customer("c1", "STU001")))
                .with_latency(Duration::from_millis(500)),
        );
        let emitter = Arc::new(RecordingEmitter::default());
        let resolver = resolver_with(Arc::clone(&mock), Arc::clone(&emitter));

        let handle = resolver.on_face_descriptor(FaceDescriptor(vec![0.5])).unwrap();
        resolver.shutdown();
        handle.await.unwrap();

        // The match succeeded on the wire but the session was gone: no
        // state applied, no notice emitted.
        assert_eq!(resolver.resolved_customer(), None);
        assert!(emitter.successes().is_empty());
        assert_eq!(emitter.capture_closed_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_after_teardown_makes_no_request() {
        let mock = Arc::new(MockBackend::new().with_customers(vec![customer("c1", "STU001")]));
        let emitter = Arc::new(RecordingEmitter::default());
        let resolver = resolver_with(Arc::clone(&mock), emitter);

        resolver.shutdown();
        resolver.on_keystroke("STU001").await.unwrap();

        assert_eq!(mock.search_calls(), 0);
    }
}
