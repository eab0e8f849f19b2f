//! File-system corpus enumeration.

use super::DocumentSource;
use crate::models::SourceDocument;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;

/// Extension of documents picked up by the walk.
const DOCUMENT_EXTENSION: &str = "md";

/// Enumerates markdown documents below a root directory.
///
/// Entries are visited sorted by file name, so the sequence is stable
/// across runs and platforms. Paths are reported relative to the root with
/// `/` separators; the root itself never appears in them.
#[derive(Debug, Clone)]
pub struct CorpusWalker {
    root: PathBuf,
    excludes: Vec<String>,
}

impl CorpusWalker {
    /// Creates a walker with no exclusions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excludes: Vec::new(),
        }
    }

    /// Sets the path fragments to exclude, e.g. `/archive/`.
    ///
    /// A document is skipped when its root-relative path, wrapped in `/`,
    /// contains any fragment.
    #[must_use]
    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    /// Walks the root and reads every matching document.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a readable directory.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn walk(&self) -> Result<Vec<SourceDocument>> {
        if !self.root.is_dir() {
            return Err(Error::operation(
                "walk_corpus",
                format!("{} is not a directory", self.root.display()),
            ));
        }

        let mut documents = Vec::new();
        let mut skipped = 0usize;

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                    continue;
                },
            };
            if !entry.file_type().is_file() || !has_document_extension(entry.path()) {
                continue;
            }

            let relative = relative_slash_path(&self.root, entry.path());
            if self.is_excluded(&relative) {
                skipped += 1;
                continue;
            }

            documents.push(match std::fs::read(entry.path()) {
                Ok(bytes) => SourceDocument::new(relative, bytes),
                Err(e) => SourceDocument::unreadable(relative, e.to_string()),
            });
        }

        tracing::debug!(documents = documents.len(), excluded = skipped, "Corpus walked");
        Ok(documents)
    }

    fn is_excluded(&self, relative: &str) -> bool {
        let wrapped = format!("/{relative}");
        self.excludes
            .iter()
            .any(|fragment| wrapped.contains(fragment.as_str()))
    }
}

impl DocumentSource for CorpusWalker {
    fn documents(&self) -> Result<Vec<SourceDocument>> {
        self.walk()
    }
}

fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
