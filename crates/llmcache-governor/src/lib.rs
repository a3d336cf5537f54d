//! Resource governor: atomic quota tracking for memory, tasks and file
//! handles, plus a bounded resource pool for borrow-or-wait resources like
//! file handles.
//!
//! `Governor::acquire`/`release` are lock-free and never block; use
//! [`pool::ResourcePool`] when callers should wait for capacity rather than
//! fail immediately.
//!
//! # Basic Example
//!
//! ```rust
//! use llmcache_governor::{Governor, GovernorConfig, ResourceKind};
//!
//! let governor = Governor::with_config(
//!     GovernorConfig::builder().task_limit(10).name("dispatcher").build(),
//! );
//!
//! governor.acquire(ResourceKind::Tasks, 1).unwrap();
//! governor.release(ResourceKind::Tasks, 1);
//! ```
//!
//! # Guarded Acquisition
//!
//! ```rust
//! use llmcache_governor::{Governor, GovernorConfig, ResourceGuard, ResourceKind};
//!
//! let governor = Governor::with_config(GovernorConfig::default());
//! let mut guard = ResourceGuard::new(governor);
//! guard.acquire(ResourceKind::Memory, 4096).unwrap();
//! // resources are released automatically when `guard` drops
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod governor;
pub mod guard;
pub mod monitor;
pub mod pool;

pub use config::{GovernorConfig, GovernorConfigBuilder};
pub use error::{GovernorError, Result};
pub use events::GovernorEvent;
pub use governor::{Governor, ResourceKind};
pub use guard::ResourceGuard;
pub use pool::{PooledResource, ResourcePool};
