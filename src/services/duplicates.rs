//! Near-duplicate detection.
//!
//! Staged documents ("candidates") are compared against every established
//! document ("corpus") in two stages:
//!
//! 1. **Prefilter**: Hamming distance between similarity fingerprints. Cheap,
//!    and rejects nearly every pair.
//! 2. **Confirmation**: token-set similarity between the two titles, only for
//!    pairs that survive the prefilter.
//!
//! At most one match is reported per candidate: the first corpus record, in
//! corpus order, that clears both thresholds. This is not necessarily the
//! closest match.

use crate::config::DetectionConfig;
use crate::fingerprint::{SimilarityHasher, hamming_distance};
use crate::matching::TitleMatcher;
use crate::models::{Diagnostic, DiagnosticKind, Location, Record, Severity};
use std::sync::Arc;
use tracing::instrument;

/// A confirmed near-duplicate pair.
#[derive(Debug, Clone)]
pub struct DuplicateMatch<'a> {
    /// Staged document.
    pub candidate: &'a Record,
    /// Established document it resembles.
    pub corpus: &'a Record,
    /// Differing fingerprint bits.
    pub hamming_distance: u32,
    /// Title similarity (0–100).
    pub title_similarity: f64,
}

impl DuplicateMatch<'_> {
    /// Content similarity derived from the Hamming distance, clamped to 0–100.
    #[must_use]
    pub fn content_similarity(&self) -> u32 {
        100u32.saturating_sub(self.hamming_distance.saturating_mul(2))
    }

    /// Converts the match into a warning diagnostic.
    #[must_use]
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(
            Location::Corpus,
            DiagnosticKind::NearDuplicate,
            Severity::Warning,
            format!(
                "Near-duplicate detected:\n  Inbox:  {}\n  Corpus: {}\n  Title similarity: {:.1}%, Content similarity: {}%",
                self.candidate.path,
                self.corpus.path,
                self.title_similarity,
                self.content_similarity()
            ),
        )
    }
}

/// Per-candidate comparison counts.
#[derive(Debug, Default, Clone, Copy)]
struct PairStats {
    compared: u64,
    rejected: u64,
}

/// Two-stage near-duplicate detector.
pub struct NearDuplicateDetector {
    hasher: Arc<dyn SimilarityHasher>,
    matcher: Arc<dyn TitleMatcher>,
    config: DetectionConfig,
    staging_dir: String,
    workers: usize,
}

impl NearDuplicateDetector {
    /// Creates a detector.
    #[must_use]
    pub fn new(
        hasher: Arc<dyn SimilarityHasher>,
        matcher: Arc<dyn TitleMatcher>,
        config: DetectionConfig,
        staging_dir: impl Into<String>,
    ) -> Self {
        Self {
            hasher,
            matcher,
            config,
            staging_dir: staging_dir.into(),
            workers: 1,
        }
    }

    /// Sets the number of threads candidates are spread over (minimum 1).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Whether both comparison capabilities are available.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.hasher.is_available() && self.matcher.is_available()
    }

    /// Finds near-duplicate pairs. Returns nothing when disabled.
    ///
    /// Candidates are reported in input order; each candidate scans the
    /// corpus in input order, so the result does not depend on the worker
    /// count.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn find_matches<'a>(&self, records: &'a [Record]) -> Vec<DuplicateMatch<'a>> {
        if !self.is_enabled() {
            tracing::debug!("Near-duplicate detection unavailable, skipping");
            return Vec::new();
        }

        let (candidates, corpus): (Vec<&Record>, Vec<&Record>) = records
            .iter()
            .filter(|r| r.similarity_fingerprint.is_some())
            .partition(|r| r.is_staged(&self.staging_dir));

        if candidates.is_empty() || corpus.is_empty() {
            return Vec::new();
        }

        let results: Vec<(Option<DuplicateMatch<'a>>, PairStats)> =
            if self.workers == 1 || candidates.len() < 2 {
                candidates
                    .iter()
                    .map(|&candidate| self.first_match(candidate, &corpus))
                    .collect()
            } else {
                let chunk_size = candidates.len().div_ceil(self.workers);
                let corpus = &corpus;
                std::thread::scope(|s| {
                    let handles: Vec<_> = candidates
                        .chunks(chunk_size)
                        .map(|chunk| {
                            s.spawn(move || {
                                chunk
                                    .iter()
                                    .map(|&candidate| self.first_match(candidate, corpus))
                                    .collect::<Vec<_>>()
                            })
                        })
                        .collect();

                    handles
                        .into_iter()
                        .zip(candidates.chunks(chunk_size))
                        .flat_map(|(handle, chunk)| {
                            handle.join().unwrap_or_else(|_| {
                                tracing::error!("Detector worker panicked, rerunning chunk inline");
                                chunk
                                    .iter()
                                    .map(|&candidate| self.first_match(candidate, corpus))
                                    .collect()
                            })
                        })
                        .collect()
                })
            };

        let mut totals = PairStats::default();
        let mut matches = Vec::new();
        for (found, stats) in results {
            totals.compared += stats.compared;
            totals.rejected += stats.rejected;
            matches.extend(found);
        }

        metrics::counter!("docreg_duplicate_pairs_compared_total").increment(totals.compared);
        metrics::counter!("docreg_prefilter_rejections_total").increment(totals.rejected);
        tracing::debug!(
            candidates = candidates.len(),
            corpus = corpus.len(),
            compared = totals.compared,
            prefilter_rejected = totals.rejected,
            matches = matches.len(),
            "Near-duplicate detection complete"
        );

        matches
    }

    /// Finds near-duplicates and converts them to diagnostics.
    #[must_use]
    pub fn detect(&self, records: &[Record]) -> Vec<Diagnostic> {
        self.find_matches(records)
            .iter()
            .map(DuplicateMatch::to_diagnostic)
            .collect()
    }

    fn first_match<'a>(
        &self,
        candidate: &'a Record,
        corpus: &[&'a Record],
    ) -> (Option<DuplicateMatch<'a>>, PairStats) {
        let mut stats = PairStats::default();
        let Some(candidate_fp) = candidate.similarity_fingerprint else {
            return (None, stats);
        };
        let candidate_title = candidate.title();

        for &established in corpus {
            let Some(corpus_fp) = established.similarity_fingerprint else {
                continue;
            };
            stats.compared += 1;

            let distance = hamming_distance(candidate_fp, corpus_fp);
            if distance > self.config.hamming_threshold {
                stats.rejected += 1;
                continue;
            }

            let Some(score) = self
                .matcher
                .similarity(&candidate_title, &established.title())
            else {
                continue;
            };

            if score >= self.config.title_threshold {
                return (
                    Some(DuplicateMatch {
                        candidate,
                        corpus: established,
                        hamming_distance: distance,
                        title_similarity: score,
                    }),
                    stats,
                );
            }
        }

        (None, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{NoopSimilarityHasher, SimHasher};
    use crate::matching::{NoopTitleMatcher, TokenSetMatcher};
    use crate::models::{MetaValue, Metadata};

    fn record(path: &str, title: &str, fingerprint: Option<u64>) -> Record {
        Record {
            path: path.to_string(),
            metadata: Metadata::new().with("title", MetaValue::String(title.to_string())),
            content_hash: String::new(),
            similarity_fingerprint: fingerprint,
        }
    }

    fn detector() -> NearDuplicateDetector {
        NearDuplicateDetector::new(
            Arc::new(SimHasher::new()),
            Arc::new(TokenSetMatcher::new()),
            DetectionConfig::default(),
            "_inbox",
        )
    }

    #[test]
    fn test_detects_close_fingerprint_and_similar_title() {
        let records = vec![
            record("docs/guides/spec-kit.md", "Spec Kit Quickstart Guide", Some(0b1010_1010)),
            record("docs/_inbox/spec-kit.md", "Spec Kit Quick Start", Some(0b1010_1001)),
        ];

        let diagnostics = detector().detect(&records);
        assert_eq!(diagnostics.len(), 1);
        let diag = &diagnostics[0];
        assert_eq!(diag.location, Location::Corpus);
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.kind, DiagnosticKind::NearDuplicate);
        assert_eq!(
            diag.message,
            "Near-duplicate detected:\n  Inbox:  docs/_inbox/spec-kit.md\n  \
             Corpus: docs/guides/spec-kit.md\n  \
             Title similarity: 84.4%, Content similarity: 96%"
        );
    }

    #[test]
    fn test_prefilter_rejects_distant_fingerprints() {
        let records = vec![
            record("docs/a.md", "Spec Kit Guide", Some(0)),
            record("docs/_inbox/a.md", "Spec Kit Guide", Some(0x1ff)),
        ];
        assert!(detector().detect(&records).is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let records = vec![
            record("docs/a.md", "Spec Kit Guide", Some(0)),
            record("docs/_inbox/a.md", "Spec Kit Guide", Some(0xff)),
        ];
        let matches = detector().find_matches(&records);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].hamming_distance, 8);
        assert_eq!(matches[0].content_similarity(), 84);
    }

    #[test]
    fn test_dissimilar_titles_not_reported() {
        let records = vec![
            record("docs/a.md", "Multi-Agent Workflow Summary", Some(7)),
            record("docs/_inbox/a.md", "Pre-Commit Hooks Guide", Some(7)),
        ];
        assert!(detector().detect(&records).is_empty());
    }

    #[test]
    fn test_first_corpus_match_wins() {
        let records = vec![
            record("docs/a.md", "Spec Kit Guide", Some(3)),
            record("docs/b.md", "Spec Kit Guide", Some(1)),
            record("docs/_inbox/new.md", "Spec Kit Guide", Some(1)),
        ];
        let matches = detector().find_matches(&records);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].corpus.path, "docs/a.md");
    }

    #[test]
    fn test_records_without_fingerprint_skipped() {
        let records = vec![
            record("docs/a.md", "Spec Kit Guide", None),
            record("docs/_inbox/new.md", "Spec Kit Guide", Some(1)),
        ];
        assert!(detector().detect(&records).is_empty());
    }

    #[test]
    fn test_candidates_never_compared_with_each_other() {
        let records = vec![
            record("docs/_inbox/a.md", "Spec Kit Guide", Some(1)),
            record("docs/_inbox/b.md", "Spec Kit Guide", Some(1)),
        ];
        assert!(detector().detect(&records).is_empty());
    }

    #[test]
    fn test_unavailable_capability_is_noop() {
        let records = vec![
            record("docs/a.md", "Spec Kit Guide", Some(1)),
            record("docs/_inbox/a.md", "Spec Kit Guide", Some(1)),
        ];

        let no_hash = NearDuplicateDetector::new(
            Arc::new(NoopSimilarityHasher::new()),
            Arc::new(TokenSetMatcher::new()),
            DetectionConfig::default(),
            "_inbox",
        );
        let no_fuzzy = NearDuplicateDetector::new(
            Arc::new(SimHasher::new()),
            Arc::new(NoopTitleMatcher::new()),
            DetectionConfig::default(),
            "_inbox",
        );

        assert!(!no_hash.is_enabled());
        assert!(!no_fuzzy.is_enabled());
        assert!(no_hash.detect(&records).is_empty());
        assert!(no_fuzzy.detect(&records).is_empty());
    }

    #[test]
    fn test_parallel_detection_matches_sequential() {
        let mut records: Vec<Record> = (0..10)
            .map(|i| record(&format!("docs/c{i}.md"), "Spec Kit Guide", Some(i)))
            .collect();
        records.extend(
            (0..25).map(|i| record(&format!("docs/_inbox/n{i}.md"), "Spec Kit Guide", Some(i % 7))),
        );

        let sequential: Vec<String> = detector()
            .find_matches(&records)
            .iter()
            .map(|m| format!("{}->{}", m.candidate.path, m.corpus.path))
            .collect();
        let parallel: Vec<String> = detector()
            .with_workers(4)
            .find_matches(&records)
            .iter()
            .map(|m| format!("{}->{}", m.candidate.path, m.corpus.path))
            .collect();

        assert_eq!(sequential.len(), 25);
        assert_eq!(sequential, parallel);
    }
}
