//! # canteen-client: Backend Access for Canteen POS
//!
//! All network access lives in this crate, behind the [`Backend`] trait.
//! The transaction engine in `canteen-session` never touches reqwest
//! directly; it takes an `Arc<dyn Backend>` and couldn't care less whether
//! the other end is the real canteen server or a scripted mock.
//!
//! ## Modules
//!
//! - [`backend`] - the `Backend` trait (the seam)
//! - [`http`] - reqwest implementation against the REST API
//! - [`mock`] - scripted in-memory implementation with call counters
//! - [`envelope`] - the `{ success, data, message }` wire wrapper
//! - [`error`] - transport/server error taxonomy

pub mod backend;
pub mod envelope;
pub mod error;
pub mod http;
pub mod mock;

pub use backend::Backend;
pub use envelope::Envelope;
pub use error::{BackendError, BackendResult};
pub use http::HttpBackend;
pub use mock::MockBackend;
