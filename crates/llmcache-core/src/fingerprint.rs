//! Stable request fingerprints.
//!
//! A [`Fingerprint`] is the identity of a cacheable request: two requests
//! that would produce the same cached answer must canonicalise to the same
//! fingerprint, and requests that differ in any identity-bearing field must
//! not collide (SHA-256 makes accidental collision astronomically unlikely;
//! a true collision is treated as cache identity, per design).

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Short literal tag prefixed to every rendered fingerprint hash.
const FINGERPRINT_PREFIX: &str = "llm_";

/// The identity-bearing fields of a single request.
///
/// Field order here is the canonicalisation order: serialising this struct
/// with `serde_json` always emits fields in declaration order, so the same
/// logical key always produces the same JSON bytes and therefore the same
/// hash.
#[derive(Debug, Clone, Serialize)]
pub struct FingerprintKey {
    pub backend_id: String,
    pub model_id: String,
    pub captured_context: String,
    pub language: String,
    pub request_kind: String,
    pub prompt: Option<String>,
}

/// A canonical, hex-encoded fingerprint of a [`FingerprintKey`].
///
/// `Fingerprint` equality matches key equality: two keys with identical
/// fields always render to equal fingerprints, and (barring a SHA-256
/// collision) only those keys do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hash a key into its canonical fingerprint.
    ///
    /// Returns `None` only if the key cannot be serialised, which does not
    /// happen for well-formed `FingerprintKey` values (all fields are plain
    /// strings/options) but is surfaced rather than panicking since the
    /// caller may construct the key from arbitrary upstream text.
    pub fn of(key: &FingerprintKey) -> Option<Self> {
        let canonical = serde_json::to_string(key).ok()?;
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let digest = hasher.finalize();
        Some(Fingerprint(format!("{FINGERPRINT_PREFIX}{digest:x}")))
    }

    /// The rendered hash, e.g. for use as a filename or JSON index key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reconstructs a `Fingerprint` from an already-rendered hash, e.g. a
    /// JSON index key read back off disk. Rejects strings missing the
    /// literal `llm_` prefix so a corrupted index key cannot silently
    /// masquerade as a valid fingerprint.
    pub fn from_hash(hash: impl Into<String>) -> Option<Self> {
        let hash = hash.into();
        if hash.starts_with(FINGERPRINT_PREFIX) {
            Some(Fingerprint(hash))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
