//! Canonical uniqueness check.

use crate::matching::concept_key;
use crate::models::{Diagnostic, DiagnosticKind, Location, Record, Severity};
use std::collections::BTreeMap;

/// Ensures at most one canonical document exists per concept.
///
/// The concept of a record is the normalized form of its title (see
/// [`concept_key`]). Records with a blank concept are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalUniquenessChecker;

impl CanonicalUniquenessChecker {
    /// Creates a checker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns one error per concept claimed by two or more canonical records.
    ///
    /// Diagnostics are ordered by concept key; paths within a message are sorted.
    #[must_use]
    pub fn check(&self, records: &[Record]) -> Vec<Diagnostic> {
        let mut by_concept: BTreeMap<String, Vec<&str>> = BTreeMap::new();

        for record in records.iter().filter(|r| r.is_canonical()) {
            let key = concept_key(&record.title());
            if key.is_empty() {
                continue;
            }
            by_concept.entry(key).or_default().push(&record.path);
        }

        by_concept
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(key, mut paths)| {
                paths.sort_unstable();
                tracing::debug!(concept = %key, count = paths.len(), "Canonical conflict");
                Diagnostic::new(
                    Location::Corpus,
                    DiagnosticKind::CanonicalConflict,
                    Severity::Error,
                    format!(
                        "Multiple canonical docs for concept '{key}':\n  {}",
                        paths.join("\n  ")
                    ),
                )
            })
            .collect()
    }
}
