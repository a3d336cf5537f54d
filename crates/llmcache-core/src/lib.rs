//! Shared infrastructure used by every crate in this workspace: the unified
//! [`CoreError`] type, the event/observability system, request fingerprints,
//! and the `Backend` contract.

pub mod backend;
pub mod error;
pub mod events;
pub mod fingerprint;

pub use backend::{Backend, BackendError, Captured, EnhancedCaptured, Suggestion};
pub use error::CoreError;
pub use events::{EventListener, EventListeners, FnListener, ResilienceEvent};
pub use fingerprint::{Fingerprint, FingerprintKey};
