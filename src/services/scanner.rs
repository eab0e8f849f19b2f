//! Document scanning.
//!
//! Turns each [`SourceDocument`] into at most one [`Record`] plus any
//! diagnostics. Documents are independent, so the work is split across
//! scoped worker threads; results are merged back in input order.

use crate::fingerprint::{ContentHasher, SimilarityHasher};
use crate::models::{Diagnostic, DiagnosticKind, Record, SourceDocument};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

use super::extractor::MetadataExtractor;

/// Output of a scan, in input order.
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Records for documents that carried a front-matter block.
    pub records: Vec<Record>,
    /// Per-document diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of scanning a single document.
#[derive(Debug, Default)]
struct DocumentOutcome {
    record: Option<Record>,
    diagnostics: Vec<Diagnostic>,
}

/// Scans documents into records.
pub struct DocumentScanner {
    extractor: MetadataExtractor,
    hasher: Arc<dyn SimilarityHasher>,
    workers: usize,
}

impl DocumentScanner {
    /// Creates a scanner.
    ///
    /// `workers` is clamped to at least one thread.
    #[must_use]
    pub fn new(
        extractor: MetadataExtractor,
        hasher: Arc<dyn SimilarityHasher>,
        workers: usize,
    ) -> Self {
        Self {
            extractor,
            hasher,
            workers: workers.max(1),
        }
    }

    /// Scans all documents.
    ///
    /// The output order matches the input order regardless of the worker
    /// count.
    #[instrument(skip(self, documents), fields(documents = documents.len(), workers = self.workers))]
    pub fn scan(&self, documents: &[SourceDocument]) -> ScanOutput {
        let start = Instant::now();

        let outcomes: Vec<DocumentOutcome> = if self.workers == 1 || documents.len() < 2 {
            documents.iter().map(|doc| self.scan_one(doc)).collect()
        } else {
            let chunk_size = documents.len().div_ceil(self.workers);
            std::thread::scope(|s| {
                let handles: Vec<_> = documents
                    .chunks(chunk_size)
                    .map(|chunk| {
                        s.spawn(move || {
                            chunk.iter().map(|doc| self.scan_one(doc)).collect::<Vec<_>>()
                        })
                    })
                    .collect();

                // Joined in spawn order, so chunk order is preserved.
                handles
                    .into_iter()
                    .zip(documents.chunks(chunk_size))
                    .flat_map(|(handle, chunk)| {
                        handle.join().unwrap_or_else(|_| {
                            tracing::error!("Scanner worker panicked, rescanning chunk inline");
                            chunk.iter().map(|doc| self.scan_one(doc)).collect()
                        })
                    })
                    .collect()
            })
        };

        let mut output = ScanOutput::default();
        for outcome in outcomes {
            output.records.extend(outcome.record);
            output.diagnostics.extend(outcome.diagnostics);
        }

        metrics::counter!("docreg_documents_scanned_total").increment(documents.len() as u64);
        tracing::debug!(
            records = output.records.len(),
            diagnostics = output.diagnostics.len(),
            duration_ms = start.elapsed().as_millis(),
            "Scan complete"
        );

        output
    }

    /// Scans one document.
    fn scan_one(&self, doc: &SourceDocument) -> DocumentOutcome {
        let bytes = match &doc.content {
            Ok(bytes) => bytes,
            Err(reason) => return read_failure(&doc.path, reason),
        };

        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => return read_failure(&doc.path, &e.to_string()),
        };

        let extraction = self.extractor.extract(&doc.path, text);
        let record = extraction.metadata.map(|metadata| Record {
            path: doc.path.clone(),
            metadata,
            content_hash: ContentHasher::hash(bytes),
            similarity_fingerprint: self.hasher.fingerprint_body(extraction.body),
        });

        DocumentOutcome {
            record,
            diagnostics: extraction.diagnostics,
        }
    }
}

fn read_failure(path: &str, reason: &str) -> DocumentOutcome {
    tracing::warn!(path, reason, "Failed to read document");
    DocumentOutcome {
        record: None,
        diagnostics: vec![Diagnostic::error(
            path,
            DiagnosticKind::ReadFailure,
            format!("Failed to read document: {reason}"),
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{NoopSimilarityHasher, SimHasher};

    fn doc(path: &str, title: &str) -> SourceDocument {
        SourceDocument::new(
            path,
            format!(
                "---\ndoc_id: DOC-2025-00001\ntitle: {title}\ndoc_type: guide\nstatus: active\n\
                 canonical: false\ncreated: 2025-01-01\ntags: []\nsummary: s\n---\n\
                 Body text for {title}.\n"
            ),
        )
    }

    fn scanner(workers: usize) -> DocumentScanner {
        DocumentScanner::new(
            MetadataExtractor::new("_inbox"),
            Arc::new(SimHasher::new()),
            workers,
        )
    }

    #[test]
    fn test_scan_produces_records() {
        let output = scanner(1).scan(&[doc("docs/a.md", "Alpha"), doc("docs/b.md", "Beta")]);
        assert_eq!(output.records.len(), 2);
        assert!(output.diagnostics.is_empty());

        let record = &output.records[0];
        assert_eq!(record.title(), "Alpha");
        assert_eq!(record.content_hash.len(), 64);
        assert!(record.similarity_fingerprint.is_some());
    }

    #[test]
    fn test_parallel_scan_preserves_order() {
        let docs: Vec<SourceDocument> = (0..37)
            .map(|i| doc(&format!("docs/{i:03}.md"), &format!("Doc {i}")))
            .collect();

        let sequential = scanner(1).scan(&docs);
        let parallel = scanner(4).scan(&docs);

        let seq_paths: Vec<&str> = sequential.records.iter().map(|r| r.path.as_str()).collect();
        let par_paths: Vec<&str> = parallel.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(seq_paths, par_paths);
        assert_eq!(par_paths[0], "docs/000.md");
        assert_eq!(par_paths[36], "docs/036.md");
    }

    #[test]
    fn test_unreadable_document_is_error_without_record() {
        let output = scanner(1).scan(&[SourceDocument::unreadable("docs/gone.md", "permission denied")]);
        assert!(output.records.is_empty());
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::ReadFailure);
        assert!(output.diagnostics[0].is_error());
    }

    #[test]
    fn test_invalid_utf8_is_read_failure() {
        let output = scanner(1).scan(&[SourceDocument::new("docs/bin.md", vec![0xff, 0xfe, 0x00])]);
        assert!(output.records.is_empty());
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::ReadFailure);
    }

    #[test]
    fn test_no_front_matter_no_record() {
        let output = scanner(1).scan(&[SourceDocument::new("docs/plain.md", "# Plain\n")]);
        assert!(output.records.is_empty());
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::MissingFrontMatter);
    }

    #[test]
    fn test_parse_failure_still_fingerprints_body() {
        let output = scanner(1).scan(&[SourceDocument::new(
            "docs/broken.md",
            "---\ntitle: [unclosed\n---\nSome body words here\n",
        )]);
        assert_eq!(output.records.len(), 1);
        assert!(output.records[0].metadata.is_empty());
        assert!(output.records[0].similarity_fingerprint.is_some());
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::SchemaParseFailure);
    }

    #[test]
    fn test_empty_body_has_no_fingerprint() {
        let output = scanner(1).scan(&[SourceDocument::new(
            "docs/empty.md",
            "---\ntitle: Empty\n---\n```\ncode only\n```\n",
        )]);
        assert_eq!(output.records[0].similarity_fingerprint, None);
    }

    #[test]
    fn test_noop_hasher_leaves_fingerprint_absent() {
        let scanner = DocumentScanner::new(
            MetadataExtractor::new("_inbox"),
            Arc::new(NoopSimilarityHasher::new()),
            2,
        );
        let output = scanner.scan(&[doc("docs/a.md", "Alpha")]);
        assert_eq!(output.records[0].similarity_fingerprint, None);
    }
}
