//! Observability metrics for derivations
//!
//! Tracks where time goes in one `generate` call. Metrics carry no secret
//! material and are safe to hand to a UI or export layer.

use serde::{Deserialize, Serialize};

/// Per-call derivation metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationMetrics {
    /// Key derivation time in microseconds (0 when stretching is disabled)
    pub kdf_time_micros: u64,

    /// Whether the stretched key came from the cache
    pub kdf_cache_hit: bool,

    /// Digest computation and alphabet encoding time in microseconds
    pub encode_time_micros: u64,

    /// Number of digests computed
    pub hash_iterations: u32,

    /// Characters rewritten by coverage enforcement (None if it did not run)
    pub coverage_replacements: Option<usize>,
}

impl DerivationMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        DerivationMetrics {
            kdf_time_micros: 0,
            kdf_cache_hit: false,
            encode_time_micros: 0,
            hash_iterations: 0,
            coverage_replacements: None,
        }
    }

    /// Set key derivation metrics
    pub fn with_kdf(mut self, time_micros: u64, cache_hit: bool) -> Self {
        self.kdf_time_micros = time_micros;
        self.kdf_cache_hit = cache_hit;
        self
    }

    /// Set codec metrics
    pub fn with_encoding(mut self, time_micros: u64, hash_iterations: u32) -> Self {
        self.encode_time_micros = time_micros;
        self.hash_iterations = hash_iterations;
        self
    }

    pub fn with_coverage(mut self, replacements: usize) -> Self {
        self.coverage_replacements = Some(replacements);
        self
    }

    /// Total operation time in microseconds
    pub fn total_time_micros(&self) -> u64 {
        self.kdf_time_micros + self.encode_time_micros
    }
}

impl Default for DerivationMetrics {
    fn default() -> Self {
        Self::new()
    }
}
