//! Semantic index: a second approximate-match structure over keyword sets,
//! embedding vectors and fingerprint bit patterns rather than raw request
//! text (§4.6).

use crate::config::{
    SemanticIndexConfig, SEMANTIC_FINGERPRINT_WEIGHT, SEMANTIC_KEYWORDS_WEIGHT,
    SEMANTIC_VECTOR_WEIGHT,
};
use crate::error::{Result, SimilarityError};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Instant;

/// Semantic fingerprint of a request: a keyword set, a fixed-length
/// embedding vector, and a short hex fingerprint used for a cheap bitwise
/// similarity signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticData {
    pub keywords: HashSet<String>,
    pub vector: Vec<f64>,
    /// Hex-encoded fingerprint, compared bit-by-bit via Hamming distance.
    pub fingerprint: String,
}

struct SemanticEntry {
    data: SemanticData,
    payload: String,
    added_at: Instant,
}

/// Ranks stored entries against a query by a fixed-weight combination of
/// keyword Jaccard similarity, cosine similarity of the embedding vectors,
/// and Hamming-ratio similarity of the hex fingerprints.
pub struct SemanticIndex {
    entries: Mutex<VecDeque<SemanticEntry>>,
    config: SemanticIndexConfig,
}

impl SemanticIndex {
    pub fn new(config: SemanticIndexConfig) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(config.max_entries.max(1))),
            config,
        }
    }

    /// Adds an entry, evicting the oldest one if at capacity.
    ///
    /// # Errors
    /// Returns [`SimilarityError::DimensionMismatch`] if `data.vector`'s
    /// length does not match the index's configured `vector_dimensions`.
    pub fn add(&self, data: SemanticData, payload: String) -> Result<()> {
        if data.vector.len() != self.config.vector_dimensions {
            return Err(SimilarityError::DimensionMismatch {
                expected: self.config.vector_dimensions,
                actual: data.vector.len(),
            });
        }
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= self.config.max_entries {
            entries.pop_front();
        }
        entries.push_back(SemanticEntry {
            data,
            payload,
            added_at: Instant::now(),
        });
        Ok(())
    }

    /// Returns up to `top_k` payloads scoring at or above the configured
    /// threshold, ordered highest score first.
    pub fn query(&self, query: &SemanticData, top_k: usize) -> Vec<String> {
        let entries = self.entries.lock().unwrap();
        let mut scored: Vec<(f64, &String, Instant)> = entries
            .iter()
            .filter_map(|entry| {
                let score = combined_score(query, &entry.data).ok()?;
                (score >= self.config.threshold).then_some((score, &entry.payload, entry.added_at))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.2.cmp(&a.2))
        });
        scored
            .into_iter()
            .take(top_k)
            .map(|(_, payload, _)| payload.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

fn combined_score(a: &SemanticData, b: &SemanticData) -> Result<f64> {
    Ok(SEMANTIC_KEYWORDS_WEIGHT * keyword_jaccard(&a.keywords, &b.keywords)
        + SEMANTIC_VECTOR_WEIGHT * cosine_similarity(&a.vector, &b.vector)?
        + SEMANTIC_FINGERPRINT_WEIGHT * hamming_ratio(&a.fingerprint, &b.fingerprint))
}

fn keyword_jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        1.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Cosine similarity between two equal-length vectors. Zero when either
/// vector has zero norm (the angle is undefined, not maximally similar).
fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot / (norm_a * norm_b))
    }
}

/// Fraction of matching hex characters between two equal-length
/// fingerprints, nibble by nibble. Mismatched lengths score `0.0`.
fn hamming_ratio(a: &str, b: &str) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return if a == b { 1.0 } else { 0.0 };
    }
    let matches = a.chars().zip(b.chars()).filter(|(x, y)| x == y).count();
    matches as f64 / a.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SemanticIndexConfigBuilder;

    fn data(keywords: &[&str], vector: Vec<f64>, fingerprint: &str) -> SemanticData {
        SemanticData {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            vector,
            fingerprint: fingerprint.to_string(),
        }
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        assert_eq!(cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap(), 1.0);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn cosine_rejects_mismatched_lengths() {
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn hamming_ratio_counts_matching_nibbles() {
        assert_eq!(hamming_ratio("abcd", "abcf"), 0.75);
    }

    #[test]
    fn add_rejects_wrong_vector_length() {
        let index = SemanticIndex::new(SemanticIndexConfigBuilder::new().vector_dimensions(4).build());
        let err = index
            .add(data(&["git"], vec![1.0, 2.0], "aa"), "payload".to_string())
            .unwrap_err();
        assert!(matches!(err, SimilarityError::DimensionMismatch { expected: 4, actual: 2 }));
    }

    #[test]
    fn query_returns_top_k_above_threshold_descending() {
        let index = SemanticIndex::new(
            SemanticIndexConfigBuilder::new()
                .vector_dimensions(2)
                .threshold(0.0)
                .build(),
        );
        index
            .add(data(&["git", "push"], vec![1.0, 0.0], "ff"), "exact".to_string())
            .unwrap();
        index
            .add(data(&["git"], vec![0.0, 1.0], "00"), "orthogonal".to_string())
            .unwrap();

        let query = data(&["git", "push"], vec![1.0, 0.0], "ff");
        let results = index.query(&query, 1);
        assert_eq!(results, vec!["exact".to_string()]);
    }

    #[test]
    fn query_excludes_entries_below_threshold() {
        let index = SemanticIndex::new(
            SemanticIndexConfigBuilder::new()
                .vector_dimensions(2)
                .threshold(0.9)
                .build(),
        );
        index
            .add(data(&["git"], vec![0.0, 1.0], "00"), "orthogonal".to_string())
            .unwrap();
        let query = data(&["git", "push"], vec![1.0, 0.0], "ff");
        assert!(index.query(&query, 5).is_empty());
    }

    #[test]
    fn overflow_evicts_oldest_entry() {
        let index = SemanticIndex::new(
            SemanticIndexConfigBuilder::new()
                .vector_dimensions(1)
                .max_entries(1)
                .threshold(0.0)
                .build(),
        );
        index.add(data(&["a"], vec![1.0], "aa"), "first".to_string()).unwrap();
        index.add(data(&["b"], vec![1.0], "bb"), "second".to_string()).unwrap();
        assert_eq!(index.len(), 1);
        let query = data(&["a"], vec![1.0], "aa");
        assert_eq!(index.query(&query, 5), vec!["second".to_string()]);
    }
}
