//! Token-set similarity ratio.

use super::TitleMatcher;
use std::collections::BTreeSet;

/// Order-insensitive token overlap scorer.
///
/// Both strings are lowercased, non-alphanumeric characters become spaces,
/// and each side is reduced to its set of tokens. The score is the best
/// indel ratio among the shared tokens and each side's
/// "shared + remaining" form, so a title that only adds words to another
/// still scores 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetMatcher;

impl TokenSetMatcher {
    /// Creates a new matcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TitleMatcher for TokenSetMatcher {
    fn similarity(&self, a: &str, b: &str) -> Option<f64> {
        Some(token_set_ratio(a, b))
    }
}

/// Computes the token-set ratio of two strings (0–100).
///
/// # Example
///
/// ```rust
/// use docreg::matching::token_set_ratio;
///
/// assert_eq!(token_set_ratio("Spec Kit Guide", "guide spec kit"), 100.0);
/// assert!(token_set_ratio("Spec Kit Quick Start", "Spec Kit Quickstart Guide") >= 80.0);
/// assert!(token_set_ratio("Spec Kit Guide", "Rendering Pipeline") < 50.0);
/// ```
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let processed_a = process(a);
    let processed_b = process(b);
    let tokens_a: BTreeSet<&str> = processed_a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = processed_b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = join(tokens_a.intersection(&tokens_b));
    let diff_ab = join(tokens_a.difference(&tokens_b));
    let diff_ba = join(tokens_b.difference(&tokens_a));

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let combined_ab = combine(&intersection, &diff_ab);
    let combined_ba = combine(&intersection, &diff_ba);

    let mut best = ratio(&combined_ab, &combined_ba);
    if !intersection.is_empty() {
        best = best
            .max(ratio(&intersection, &combined_ab))
            .max(ratio(&intersection, &combined_ba));
    }
    best
}

fn process(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect()
}

fn join<'a>(tokens: impl Iterator<Item = &'a &'a str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn combine(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// Normalized indel similarity: `200 * lcs / (len_a + len_b)`.
#[allow(clippy::cast_precision_loss)]
fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(&a, &b) as f64 / total as f64
}

/// Length of the longest common subsequence, two-row dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
