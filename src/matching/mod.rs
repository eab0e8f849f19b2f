//! Title matching.
//!
//! Provides concept keys for grouping documents by subject and a fuzzy
//! title similarity used to confirm near-duplicate candidates. Fuzzy matching
//! is a capability behind [`TitleMatcher`]; [`NoopTitleMatcher`] disables it.

mod fallback;
mod token_set;

pub use fallback::NoopTitleMatcher;
pub use token_set::{TokenSetMatcher, token_set_ratio};

use regex::Regex;
use std::sync::LazyLock;

/// Runs of non-word characters.
static NON_WORD_PATTERN: LazyLock<Regex> = lazy_regex!(r"\W+");

/// Trait for title similarity scorers.
pub trait TitleMatcher: Send + Sync {
    /// Whether this matcher produces scores at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Scores the similarity of two titles on a 0–100 scale.
    ///
    /// Returns `None` when the capability is unavailable.
    fn similarity(&self, a: &str, b: &str) -> Option<f64>;
}

/// Normalized concept key of a title: lowercased, non-word runs collapsed, trimmed.
///
/// # Example
///
/// ```rust
/// use docreg::matching::concept_key;
///
/// assert_eq!(concept_key("Task Runner Guide"), "task runner guide");
/// assert_eq!(concept_key("task   runner  guide"), "task runner guide");
/// assert_eq!(concept_key("  --  "), "");
/// ```
#[must_use]
pub fn concept_key(title: &str) -> String {
    NON_WORD_PATTERN
        .replace_all(&title.to_lowercase(), " ")
        .trim()
        .to_string()
}
