//! Validation pipeline orchestration.
//!
//! Wires the passes together:
//!
//! ```text
//! SourceDocument ─► DocumentScanner ─► Record ─┬─► CanonicalUniquenessChecker ─┐
//!                                              ├─► NearDuplicateDetector ──────┼─► diagnostics
//!                                              └─► RegistryBuilder ─► RegistryWriter (full mode)
//! ```

use crate::config::DocregConfig;
use crate::fingerprint::{NoopSimilarityHasher, SimHasher, SimilarityHasher};
use crate::io::{CorpusWalker, DocumentSource};
use crate::matching::{NoopTitleMatcher, TitleMatcher, TokenSetMatcher};
use crate::models::{Diagnostic, Registry, Severity, SourceDocument};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

use super::duplicates::NearDuplicateDetector;
use super::extractor::MetadataExtractor;
use super::registry::{RegistryBuilder, RegistryWriter};
use super::scanner::DocumentScanner;
use super::uniqueness::CanonicalUniquenessChecker;

/// How much of the pipeline a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Validate and rewrite the registry.
    #[default]
    Full,
    /// Validate only; the registry on disk is untouched.
    CheckOnly,
}

impl RunMode {
    /// Whether the run persists the registry.
    #[must_use]
    pub const fn writes_registry(self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Outcome of a validation run.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// All diagnostics: per-document first (input order), then canonical
    /// conflicts, then near-duplicates.
    pub diagnostics: Vec<Diagnostic>,
    /// The aggregated registry (built in every mode).
    pub registry: Registry,
    /// Where the registry was written, in full mode.
    pub registry_path: Option<PathBuf>,
}

impl ValidationReport {
    /// Number of diagnostics with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Whether any diagnostic is an error. The run fails exactly when this is true.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Process exit code for this report.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }

    /// Whether the registry was persisted.
    #[must_use]
    pub const fn registry_written(&self) -> bool {
        self.registry_path.is_some()
    }
}

/// Runs the full validation pipeline.
pub struct ValidationService {
    config: DocregConfig,
    scanner: DocumentScanner,
    uniqueness: CanonicalUniquenessChecker,
    detector: NearDuplicateDetector,
    builder: RegistryBuilder,
    writer: RegistryWriter,
}

impl ValidationService {
    /// Creates a service, selecting capabilities from the feature flags.
    #[must_use]
    pub fn new(config: DocregConfig) -> Self {
        let hasher: Arc<dyn SimilarityHasher> = if config.features.similarity_hash {
            Arc::new(SimHasher::new())
        } else {
            Arc::new(NoopSimilarityHasher::new())
        };
        let matcher: Arc<dyn TitleMatcher> = if config.features.fuzzy_matching {
            Arc::new(TokenSetMatcher::new())
        } else {
            Arc::new(NoopTitleMatcher::new())
        };
        Self::with_capabilities(config, hasher, matcher)
    }

    /// Creates a service with explicit comparison capabilities.
    #[must_use]
    pub fn with_capabilities(
        config: DocregConfig,
        hasher: Arc<dyn SimilarityHasher>,
        matcher: Arc<dyn TitleMatcher>,
    ) -> Self {
        let extractor = MetadataExtractor::new(config.staging_dir.clone());
        let scanner = DocumentScanner::new(extractor, Arc::clone(&hasher), config.workers);
        let detector =
            NearDuplicateDetector::new(hasher, matcher, config.detection, config.staging_dir.clone())
                .with_workers(config.workers);

        Self {
            config,
            scanner,
            uniqueness: CanonicalUniquenessChecker::new(),
            detector,
            builder: RegistryBuilder::new(),
            writer: RegistryWriter::new(),
        }
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &DocregConfig {
        &self.config
    }

    /// Walks the configured docs root and validates everything found.
    ///
    /// # Errors
    ///
    /// Returns an error if the docs root cannot be walked or, in full mode,
    /// the registry cannot be written.
    pub fn run(&self, mode: RunMode) -> Result<ValidationReport> {
        let walker = CorpusWalker::new(&self.config.docs_root)
            .with_excludes(self.config.exclude_patterns.clone());
        self.run_source(&walker, mode)
    }

    /// Validates every document a source yields.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be enumerated or, in full mode,
    /// the registry cannot be written.
    pub fn run_source(&self, source: &dyn DocumentSource, mode: RunMode) -> Result<ValidationReport> {
        let documents = source.documents()?;
        self.run_documents(&documents, mode)
    }

    /// Validates an already enumerated set of documents.
    ///
    /// # Errors
    ///
    /// Returns an error if, in full mode, the registry cannot be written.
    #[instrument(skip(self, documents), fields(documents = documents.len(), mode = ?mode))]
    pub fn run_documents(
        &self,
        documents: &[SourceDocument],
        mode: RunMode,
    ) -> Result<ValidationReport> {
        let start = Instant::now();

        let scan = self.scanner.scan(documents);
        let mut diagnostics = scan.diagnostics;
        diagnostics.extend(self.uniqueness.check(&scan.records));
        diagnostics.extend(self.detector.detect(&scan.records));

        let registry = self.builder.build(&scan.records, chrono::Utc::now());

        let registry_path = if mode.writes_registry() {
            let path = self.config.registry_path();
            self.writer.write(&registry, &path)?;
            Some(path)
        } else {
            tracing::debug!("Check-only mode, registry not written");
            None
        };

        for severity in Severity::all() {
            let count = diagnostics.iter().filter(|d| d.severity == *severity).count();
            metrics::counter!("docreg_diagnostics_total", "severity" => severity.as_str())
                .increment(count as u64);
        }
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("docreg_validation_duration_ms").record(elapsed_ms);
        tracing::info!(
            records = scan.records.len(),
            diagnostics = diagnostics.len(),
            duration_ms = elapsed_ms,
            "Validation complete"
        );

        Ok(ValidationReport {
            diagnostics,
            registry,
            registry_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureFlags;
    use crate::models::DiagnosticKind;

    fn doc(path: &str, title: &str, canonical: bool, body: &str) -> SourceDocument {
        SourceDocument::new(
            path,
            format!(
                "---\ndoc_id: DOC-2025-00001\ntitle: {title}\ndoc_type: guide\nstatus: active\n\
                 canonical: {canonical}\ncreated: 2025-01-01\ntags: [a]\nsummary: s\n---\n{body}"
            ),
        )
    }

    fn service(features: FeatureFlags) -> ValidationService {
        ValidationService::new(DocregConfig::default().with_features(features).with_workers(2))
    }

    #[test]
    fn test_check_only_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let registry_path = dir.path().join("registry.json");
        let config = DocregConfig::default().with_registry_path(&registry_path);
        let report = ValidationService::new(config)
            .run_documents(&[doc("docs/a.md", "A", true, "Body\n")], RunMode::CheckOnly)
            .unwrap();

        assert!(!report.registry_written());
        assert!(!registry_path.exists());
        assert_eq!(report.registry.total_docs, 1);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_full_mode_writes_even_with_errors() {
        let dir = tempfile::tempdir().unwrap();
        let registry_path = dir.path().join("index").join("registry.json");
        let config = DocregConfig::default().with_registry_path(&registry_path);
        let docs = vec![
            doc("docs/a.md", "Shared Concept", true, "One\n"),
            doc("docs/b.md", "shared concept", true, "Two\n"),
        ];
        let report = ValidationService::new(config)
            .run_documents(&docs, RunMode::Full)
            .unwrap();

        assert!(report.registry_written());
        assert!(registry_path.exists());
        assert!(report.has_errors());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.count(Severity::Error), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::CanonicalConflict);
    }

    #[test]
    fn test_warnings_only_exit_zero() {
        let docs = vec![SourceDocument::new("docs/plain.md", "# No header\n")];
        let report = service(FeatureFlags::all())
            .run_documents(&docs, RunMode::CheckOnly)
            .unwrap();
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.registry.total_docs, 0);
    }

    #[test]
    fn test_near_duplicate_and_disabled_features() {
        let body = "Spec Kit turns feature ideas into specifications, plans and tasks. \
                    Run the specify command, review the generated plan, then implement.\n"
            .repeat(5);
        let docs = vec![
            doc("docs/guides/spec-kit-quickstart.md", "Spec Kit Quickstart Guide", true, &body),
            doc("docs/_inbox/quick-start.md", "Spec Kit Quick Start", false, &body),
        ];

        let enabled = service(FeatureFlags::all())
            .run_documents(&docs, RunMode::CheckOnly)
            .unwrap();
        let near: Vec<_> = enabled
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::NearDuplicate)
            .collect();
        assert_eq!(near.len(), 1);
        assert!(near[0].message.contains("Content similarity: 100%"));

        for features in [
            FeatureFlags::none(),
            FeatureFlags {
                similarity_hash: true,
                fuzzy_matching: false,
            },
        ] {
            let report = service(features)
                .run_documents(&docs, RunMode::CheckOnly)
                .unwrap();
            assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        }
    }

    #[test]
    fn test_simhash_disabled_through_environment() {
        let body = "Spec Kit turns feature ideas into specifications and plans.\n".repeat(5);
        let docs = vec![
            doc("docs/guides/spec-kit.md", "Spec Kit Quick Start", true, &body),
            doc("docs/_inbox/spec-kit.md", "Spec Kit Quick Start", false, &body),
        ];
        let env = |key: &str| (key == "DOCREG_DISABLE_SIMHASH").then(|| "1".to_string());
        let config = DocregConfig::default()
            .with_workers(1)
            .with_overrides_from(&env);

        let report = ValidationService::new(config)
            .run_documents(&docs, RunMode::CheckOnly)
            .unwrap();
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert!(report.registry.docs.iter().all(|d| d.similarity_fingerprint.is_none()));
    }
}
