//! Worker pools for the dispatcher and pipeline: fixed-size worker sets
//! draining bounded task queues, with a priority-ordered variant and EMA
//! completion stats.
//!
//! # Basic Example
//!
//! ```rust
//! use llmcache_pool::{PoolConfig, Task, WorkerPool};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let pool: WorkerPool<String, ()> = WorkerPool::new(PoolConfig {
//!     worker_count: 4,
//!     queue_size: 64,
//!     default_timeout: Duration::from_secs(5),
//!     enable_stats: true,
//!     name: "local".to_string(),
//! });
//!
//! let task = Task::new(
//!     || async { Ok::<_, ()>("done".to_string()) },
//!     |_result| {},
//! );
//! assert!(pool.submit(task));
//! pool.shutdown(Duration::from_secs(1)).await;
//! # }
//! ```
//!
//! # Priority Variant
//!
//! ```rust
//! use llmcache_pool::{PoolConfig, PriorityWorkerPool, Task};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let pool: PriorityWorkerPool<(), ()> = PriorityWorkerPool::new(PoolConfig {
//!     worker_count: 2,
//!     queue_size: 32,
//!     default_timeout: Duration::from_secs(1),
//!     enable_stats: false,
//!     name: "remote-model".to_string(),
//! });
//!
//! let task = Task::new(|| async { Ok(()) }, |_| {});
//! pool.submit(task, 5).await.unwrap();
//! # }
//! ```

pub mod error;
pub mod executor;
pub mod priority;
pub mod stats;
pub mod worker;

pub use error::{PoolError, Result, TimeoutError};
pub use executor::{BlockingExecutor, CurrentRuntime, Executor};
pub use priority::PriorityWorkerPool;
pub use stats::{PoolStats, PoolStatsSnapshot};
pub use worker::{BoxFuture, PoolConfig, Task, WorkerPool};
