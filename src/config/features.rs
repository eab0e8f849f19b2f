//! Feature flags for optional capabilities.

use serde::Serialize;

/// Toggles for the optional comparison capabilities.
///
/// Near-duplicate detection needs both; turning either off selects the
/// no-op implementation at startup and the detector reports nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    /// Compute SimHash fingerprints.
    pub similarity_hash: bool,
    /// Score title similarity.
    pub fuzzy_matching: bool,
}

impl FeatureFlags {
    /// Creates feature flags with all capabilities disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            similarity_hash: false,
            fuzzy_matching: false,
        }
    }

    /// Creates feature flags with all capabilities enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            similarity_hash: true,
            fuzzy_matching: true,
        }
    }

    /// Whether near-duplicate detection can run.
    #[must_use]
    pub const fn duplicate_detection(&self) -> bool {
        self.similarity_hash && self.fuzzy_matching
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::all()
    }
}
