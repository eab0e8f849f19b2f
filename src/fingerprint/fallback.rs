//! Fallback hasher (similarity detection disabled).

use super::SimilarityHasher;

/// Similarity hasher that never produces a fingerprint.
///
/// Used when similarity hashing is turned off, which makes near-duplicate
/// detection a no-op.
pub struct NoopSimilarityHasher;

impl NoopSimilarityHasher {
    /// Creates a new no-op hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for NoopSimilarityHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityHasher for NoopSimilarityHasher {
    fn is_available(&self) -> bool {
        false
    }

    fn fingerprint(&self, _normalized: &str) -> Option<u64> {
        None
    }
}
