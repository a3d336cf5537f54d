//! Staged serial/parallel pipeline composition (§4.9): an ordered list of
//! stages a value is folded through, each either inline-under-timeout or
//! backed by its own worker pool, with per-stage and per-pipeline EMA
//! statistics.
//!
//! ```no_run
//! use llmcache_pipeline::{Pipeline, PipelineConfig, Stage, StageConfig};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let stages = vec![
//!     Stage::new(StageConfig::serial("normalize", Duration::from_millis(50)), |s: String| async move {
//!         Ok::<_, std::convert::Infallible>(s.trim().to_lowercase())
//!     }),
//!     Stage::new(StageConfig::parallel("enrich", Duration::from_secs(1), 4, 64), |s: String| async move {
//!         Ok::<_, std::convert::Infallible>(format!("{s}!"))
//!     }),
//! ];
//! let pipeline = Pipeline::new(PipelineConfig::default(), stages);
//! let result = pipeline.process("  Hello ".to_string()).await.unwrap();
//! assert_eq!(result, "hello!");
//! # }
//! ```

mod config;
mod error;
mod events;
mod pipeline;
mod stage;
mod stats;

pub use config::{PipelineConfig, PipelineConfigBuilder, StageConfig, StageKind, BATCH_CONCURRENCY};
pub use error::{PipelineError, Result};
pub use events::PipelineEvent;
pub use pipeline::Pipeline;
pub use stage::Stage;
pub use stats::{PipelineStatsSnapshot, StageStatsSnapshot};
