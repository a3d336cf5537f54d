//! Error types for the L1/L2/layered cache tiers.

/// Errors surfaced by the cache tiers (§7).
///
/// `CacheMiss` is deliberately absent: a miss is represented as `Ok(None)`
/// (or a bare `None`) at every API boundary in this crate, not as an error
/// variant. Read failures degrade to a miss rather than reaching this type.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A filesystem or serialisation failure on write.
    #[error("cache write failed: {source}")]
    CacheWriteError {
        #[source]
        source: std::io::Error,
    },

    /// `set` rejected a payload larger than `L2Config::max_file_size`.
    #[error("payload of {size} bytes exceeds max_file_size of {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },
}

/// Result type for cache tier operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_too_large_display() {
        let err = CacheError::PayloadTooLarge {
            size: 200,
            max: 100,
        };
        assert_eq!(
            err.to_string(),
            "payload of 200 bytes exceeds max_file_size of 100 bytes"
        );
    }
}
