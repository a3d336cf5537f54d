use thiserror::Error;

/// Errors raised by the similarity sidecar and semantic index.
///
/// There is deliberately no "no match" variant: an unmatched query is a
/// `None`, not an error, matching the rest of the cache stack's miss
/// convention.
#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("vector dimensions do not match: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("similarity weights must sum to 1.0, got {sum}")]
    InvalidWeights { sum: f64 },

    #[error("threshold {value} is outside the valid range [0.0, 1.0]")]
    InvalidThreshold { value: f64 },
}

pub type Result<T> = std::result::Result<T, SimilarityError>;
