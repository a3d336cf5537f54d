//! Approximate-match structures that sit alongside the exact-fingerprint
//! response cache: a ring-buffer sidecar scored on raw request fields, and
//! a semantic index scored on keywords, embeddings and fingerprint bits
//! (spec §4.6).
//!
//! # Example
//!
//! ```
//! use llmcache_similarity::{KeyFields, SimilarityConfigBuilder, SimilaritySidecar};
//! use llmcache_core::{Fingerprint, FingerprintKey};
//!
//! let sidecar = SimilaritySidecar::new(SimilarityConfigBuilder::new().threshold(0.7).build());
//! let fp = Fingerprint::of(&FingerprintKey {
//!     backend_id: "openai".into(),
//!     model_id: "gpt-x".into(),
//!     captured_context: "git push".into(),
//!     language: "en".into(),
//!     request_kind: "suggestion".into(),
//!     prompt: None,
//! }).unwrap();
//!
//! sidecar.add(
//!     fp,
//!     KeyFields { command: "git push".into(), stderr: "rejected".into(), exit_code: 1, prompt: String::new(), request_kind: "suggestion".into() },
//!     "use --force-with-lease".to_string(),
//! );
//!
//! let query = KeyFields { command: "git push".into(), stderr: "rejected non-fast-forward".into(), exit_code: 1, prompt: String::new(), request_kind: "suggestion".into() };
//! assert_eq!(sidecar.get_similar(&query), Some("use --force-with-lease".to_string()));
//! ```

mod config;
mod error;
mod events;
mod jaccard;
mod semantic;
mod sidecar;

pub use config::{
    SemanticIndexConfig, SemanticIndexConfigBuilder, SidecarWeights, SimilarityConfig,
    SimilarityConfigBuilder,
};
pub use error::{Result, SimilarityError};
pub use events::SimilarityEvent;
pub use jaccard::jaccard;
pub use semantic::{SemanticData, SemanticIndex};
pub use sidecar::{KeyFields, SimilarityEntry, SimilaritySidecar};
