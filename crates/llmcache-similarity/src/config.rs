//! Configuration for the similarity sidecar and semantic index (§6 knobs).

/// Weights applied to the sidecar's per-field Jaccard/equality scores.
///
/// Must sum to `1.0` within a small epsilon; [`SimilarityConfigBuilder::build`]
/// panics otherwise, matching the inconsistent-config panics used elsewhere
/// in this workspace's builders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidecarWeights {
    pub command: f64,
    pub stderr: f64,
    pub exit_code: f64,
    pub prompt: f64,
}

impl Default for SidecarWeights {
    fn default() -> Self {
        Self {
            command: 0.3,
            stderr: 0.4,
            exit_code: 0.2,
            prompt: 0.1,
        }
    }
}

impl SidecarWeights {
    fn sum(&self) -> f64 {
        self.command + self.stderr + self.exit_code + self.prompt
    }
}

const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Similarity sidecar configuration.
#[derive(Debug, Clone)]
pub struct SimilarityConfig {
    pub(crate) enabled: bool,
    pub(crate) threshold: f64,
    pub(crate) max_entries: usize,
    pub(crate) weights: SidecarWeights,
    pub(crate) name: String,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.85,
            max_entries: 500,
            weights: SidecarWeights::default(),
            name: "similarity".to_string(),
        }
    }
}

/// Builder for [`SimilarityConfig`].
#[derive(Debug, Clone, Default)]
pub struct SimilarityConfigBuilder {
    config: SimilarityConfig,
}

impl SimilarityConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Minimum weighted score for a match to be returned. Default: 0.85.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Ring buffer capacity; oldest entry is dropped on overflow. Default: 500.
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = max_entries;
        self
    }

    pub fn weights(mut self, weights: SidecarWeights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Builds the config.
    ///
    /// # Panics
    /// Panics if `threshold` is outside `[0.0, 1.0]`, or if `weights` do not
    /// sum to `1.0` within `1e-6`.
    pub fn build(self) -> SimilarityConfig {
        assert!(
            (0.0..=1.0).contains(&self.config.threshold),
            "SimilarityConfig: threshold must be within [0.0, 1.0]"
        );
        let sum = self.config.weights.sum();
        assert!(
            (sum - 1.0).abs() <= WEIGHT_SUM_EPSILON,
            "SimilarityConfig: weights must sum to 1.0, got {sum}"
        );
        self.config
    }
}

/// Fixed weights for the semantic index's combined score (keywords, vector,
/// fingerprint). Unlike the sidecar weights these are not a configurable
/// knob in the source design, so they are constants rather than config
/// fields.
pub(crate) const SEMANTIC_KEYWORDS_WEIGHT: f64 = 0.3;
pub(crate) const SEMANTIC_VECTOR_WEIGHT: f64 = 0.5;
pub(crate) const SEMANTIC_FINGERPRINT_WEIGHT: f64 = 0.2;

/// Semantic index configuration.
#[derive(Debug, Clone)]
pub struct SemanticIndexConfig {
    pub(crate) threshold: f64,
    pub(crate) max_entries: usize,
    pub(crate) vector_dimensions: usize,
    pub(crate) name: String,
}

impl Default for SemanticIndexConfig {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            max_entries: 500,
            vector_dimensions: 128,
            name: "semantic-index".to_string(),
        }
    }
}

/// Builder for [`SemanticIndexConfig`].
#[derive(Debug, Clone, Default)]
pub struct SemanticIndexConfigBuilder {
    config: SemanticIndexConfig,
}

impl SemanticIndexConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = max_entries;
        self
    }

    /// Expected length of every [`crate::SemanticData::vector`] admitted
    /// into the index. Default: 128.
    pub fn vector_dimensions(mut self, dimensions: usize) -> Self {
        self.config.vector_dimensions = dimensions;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// # Panics
    /// Panics if `threshold` is outside `[0.0, 1.0]`.
    pub fn build(self) -> SemanticIndexConfig {
        assert!(
            (0.0..=1.0).contains(&self.config.threshold),
            "SemanticIndexConfig: threshold must be within [0.0, 1.0]"
        );
        self.config
    }
}
