//! 64-bit SimHash over character shingles.

use super::{ContentHasher, SimilarityHasher};
use std::collections::HashMap;

/// SimHash fingerprint generator.
///
/// # How it works
///
/// 1. Words of the normalized text are concatenated and split into
///    overlapping character shingles of [`SimHasher::SHINGLE_WIDTH`]
/// 2. Each distinct shingle is hashed to 64 bits and weighted by its count
/// 3. For every bit position the weights are summed with sign `+` when the
///    shingle hash has the bit set and `-` otherwise
/// 4. The fingerprint has a bit set wherever the sum is positive
///
/// Editing a few words changes only the handful of shingles that overlap the
/// edit, so near-identical texts land within a few bits of each other.
#[derive(Debug, Clone, Copy)]
pub struct SimHasher {
    width: usize,
}

impl SimHasher {
    /// Default shingle width in characters.
    pub const SHINGLE_WIDTH: usize = 4;

    /// Creates a hasher with the default shingle width.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            width: Self::SHINGLE_WIDTH,
        }
    }

    fn shingles(&self, normalized: &str) -> HashMap<String, i64> {
        let chars: Vec<char> = normalized.split_whitespace().flat_map(str::chars).collect();
        let mut counts: HashMap<String, i64> = HashMap::new();

        if chars.len() <= self.width {
            counts.insert(chars.iter().collect(), 1);
            return counts;
        }

        for window in chars.windows(self.width) {
            *counts.entry(window.iter().collect()).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for SimHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityHasher for SimHasher {
    fn fingerprint(&self, normalized: &str) -> Option<u64> {
        if normalized.trim().is_empty() {
            return None;
        }

        let mut weights = [0i64; 64];
        for (shingle, count) in self.shingles(normalized) {
            let hash = ContentHasher::hash_u64(shingle.as_bytes());
            for (bit, weight) in weights.iter_mut().enumerate() {
                if (hash >> bit) & 1 == 1 {
                    *weight += count;
                } else {
                    *weight -= count;
                }
            }
        }

        let mut fingerprint = 0u64;
        for (bit, weight) in weights.iter().enumerate() {
            if *weight > 0 {
                fingerprint |= 1 << bit;
            }
        }
        Some(fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::hamming_distance;

    fn long_body(variant: &str) -> String {
        (0..40)
            .map(|i| {
                format!(
                    "Step {i} of the {variant} workflow configures module number {i} and records its settings."
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_empty_text_has_no_fingerprint() {
        assert_eq!(SimHasher::new().fingerprint(""), None);
        assert_eq!(SimHasher::new().fingerprint("   "), None);
        assert_eq!(SimHasher::new().fingerprint_body("```\nonly code\n```"), None);
    }

    #[test]
    fn test_deterministic() {
        let hasher = SimHasher::new();
        let body = long_body("release");
        assert_eq!(hasher.fingerprint_body(&body), hasher.fingerprint_body(&body));
    }

    #[test]
    fn test_identical_after_normalization() {
        let hasher = SimHasher::new();
        let a = hasher.fingerprint_body("Quick Start: install, then RUN.");
        let b = hasher.fingerprint_body("quick start install then run");
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_word_edit_is_close() {
        let hasher = SimHasher::new();
        let original = long_body("release");
        let edited = original.replacen("records", "stores", 1);
        let a = hasher.fingerprint_body(&original).unwrap();
        let b = hasher.fingerprint_body(&edited).unwrap();
        assert!(hamming_distance(a, b) <= 8, "distance {}", hamming_distance(a, b));
    }

    #[test]
    fn test_unrelated_text_is_far() {
        let hasher = SimHasher::new();
        let a = hasher.fingerprint_body(&long_body("release")).unwrap();
        let b = hasher
            .fingerprint_body(
                "Glossary of terms used by the rendering team: shader, texture atlas, \
                 mipmap chain, z-buffer precision, deferred lighting and bloom passes.",
            )
            .unwrap();
        assert!(hamming_distance(a, b) > 8);
    }

    #[test]
    fn test_short_text_single_shingle() {
        assert!(SimHasher::new().fingerprint("ab").is_some());
        assert!(SimHasher::new().fingerprint("abcd").is_some());
    }
}
