//! Content hashing for exact-match detection.

use sha2::{Digest, Sha256};

/// SHA-256 hasher over raw document bytes.
///
/// Unlike the similarity fingerprint, no normalization is applied: the hash
/// is order-, case- and whitespace-sensitive, so it changes whenever a single
/// byte changes.
///
/// # Example
///
/// ```rust
/// use docreg::ContentHasher;
///
/// let hash = ContentHasher::hash(b"---\ntitle: Guide\n---\nBody\n");
/// assert_eq!(hash.len(), 64);
/// assert_ne!(hash, ContentHasher::hash(b"---\ntitle: Guide\n---\nBody \n"));
/// ```
pub struct ContentHasher;

impl ContentHasher {
    /// Computes the lowercase hex SHA-256 of `bytes`.
    #[must_use]
    pub fn hash(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hex::encode(hasher.finalize())
    }

    /// Returns the first 64 bits of the SHA-256 of `bytes`.
    ///
    /// Used as the per-feature hash inside [`super::SimHasher`].
    #[must_use]
    pub fn hash_u64(bytes: &[u8]) -> u64 {
        let digest = Sha256::digest(bytes);
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix)
    }
}
