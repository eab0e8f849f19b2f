//! Document fingerprinting.
//!
//! Two fingerprints are computed per record:
//! 1. **Content hash**: SHA-256 over the raw bytes, for exact-match detection
//! 2. **Similarity fingerprint**: 64-bit SimHash over the normalized body, for
//!    near-duplicate prefiltering by Hamming distance
//!
//! Similarity hashing is a capability behind [`SimilarityHasher`]. When it is
//! disabled the [`NoopSimilarityHasher`] is selected at startup and every
//! record carries no fingerprint.

mod content;
mod fallback;
mod normalize;
mod simhash;

pub use content::ContentHasher;
pub use fallback::NoopSimilarityHasher;
pub use normalize::normalize_body;
pub use simhash::SimHasher;

/// Trait for similarity fingerprint generators.
pub trait SimilarityHasher: Send + Sync {
    /// Whether this hasher produces fingerprints at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Computes the fingerprint of already-normalized text.
    ///
    /// Returns `None` when the text is empty.
    fn fingerprint(&self, normalized: &str) -> Option<u64>;

    /// Normalizes a document body and fingerprints it.
    fn fingerprint_body(&self, body: &str) -> Option<u64> {
        self.fingerprint(&normalize_body(body))
    }
}

/// Number of differing bits between two fingerprints.
#[must_use]
pub const fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}
