//! Fallback matcher (fuzzy matching disabled).

use super::TitleMatcher;

/// Title matcher that never scores, which turns near-duplicate detection off.
pub struct NoopTitleMatcher;

impl NoopTitleMatcher {
    /// Creates a new no-op matcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for NoopTitleMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleMatcher for NoopTitleMatcher {
    fn is_available(&self) -> bool {
        false
    }

    fn similarity(&self, _a: &str, _b: &str) -> Option<f64> {
        None
    }
}
