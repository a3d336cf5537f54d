//! Error types for the resource governor.

use crate::ResourceKind;

/// Errors that can occur when acquiring governed resources.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GovernorError {
    /// `acquire` was denied because granting it would exceed the configured
    /// hard limit for this resource kind.
    #[error("{kind} over limit: {current} + {requested} > {limit}")]
    OverLimit {
        kind: ResourceKind,
        current: u64,
        requested: u64,
        limit: u64,
    },

    /// A [`crate::pool::ResourcePool`] borrow was cancelled before a resource
    /// became available.
    #[error("cancelled waiting for a resource from pool '{pool}'")]
    Cancelled { pool: String },
}

/// Result type for resource governor operations.
pub type Result<T> = std::result::Result<T, GovernorError>;
