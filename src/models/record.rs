//! Source documents, scanned records, and registry summaries.

use super::Metadata;
use serde::{Deserialize, Serialize};

/// One document handed to the scanner by the corpus enumerator.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Corpus-relative path using `/` separators.
    pub path: String,
    /// Raw bytes, or the reason the document could not be read.
    pub content: std::result::Result<Vec<u8>, String>,
}

impl SourceDocument {
    /// Creates a readable document.
    pub fn new(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: Ok(bytes.into()),
        }
    }

    /// Creates a document whose bytes could not be read.
    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: Err(reason.into()),
        }
    }
}

/// A successfully scanned document.
#[derive(Debug, Clone)]
pub struct Record {
    /// Corpus-relative path, unique per run.
    pub path: String,
    /// Parsed front matter (empty when the block failed to parse).
    pub metadata: Metadata,
    /// Lowercase hex SHA-256 of the raw document bytes.
    pub content_hash: String,
    /// Similarity fingerprint of the normalized body, if any text remained.
    pub similarity_fingerprint: Option<u64>,
}

impl Record {
    /// Title field as text.
    #[must_use]
    pub fn title(&self) -> String {
        self.metadata.text("title")
    }

    /// Creation date field as text.
    #[must_use]
    pub fn created(&self) -> String {
        self.metadata.text("created")
    }

    /// Whether the record is flagged canonical.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.metadata.is_canonical()
    }

    /// Whether the record lives under the staging directory `staging_dir`.
    #[must_use]
    pub fn is_staged(&self, staging_dir: &str) -> bool {
        is_staged_path(&self.path, staging_dir)
    }

    /// Builds the registry summary for this record.
    #[must_use]
    pub fn summary(&self) -> DocSummary {
        let meta = &self.metadata;
        DocSummary {
            path: self.path.clone(),
            doc_id: meta.text("doc_id"),
            title: meta.text("title"),
            doc_type: meta.text("doc_type"),
            status: meta.text("status"),
            canonical: meta.is_canonical(),
            tags: meta.string_list("tags"),
            created: meta.text("created"),
            summary: meta.text("summary"),
            supersedes: meta.string_list("supersedes"),
            related: meta.string_list("related"),
            content_hash: self.content_hash.clone(),
            similarity_fingerprint: self.similarity_fingerprint.map(|fp| format!("{fp:016x}")),
        }
    }
}

/// Returns true when any directory component of `path` equals `staging_dir`.
#[must_use]
pub fn is_staged_path(path: &str, staging_dir: &str) -> bool {
    if staging_dir.is_empty() {
        return false;
    }
    let mut components: Vec<&str> = path.split('/').collect();
    // The last component is the file name.
    components.pop();
    components.iter().any(|c| *c == staging_dir)
}

/// Per-document entry of the registry. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSummary {
    /// Corpus-relative path.
    pub path: String,
    /// Document identifier.
    pub doc_id: String,
    /// Title.
    pub title: String,
    /// Document type value as written.
    pub doc_type: String,
    /// Status value as written.
    pub status: String,
    /// Canonical flag.
    pub canonical: bool,
    /// Tags.
    pub tags: Vec<String>,
    /// Creation date as written.
    pub created: String,
    /// Free-text summary.
    pub summary: String,
    /// Identifiers this document supersedes.
    pub supersedes: Vec<String>,
    /// Related identifiers.
    pub related: Vec<String>,
    /// Hex SHA-256 of the raw bytes.
    pub content_hash: String,
    /// Hex similarity fingerprint, `null` when the body was empty.
    pub similarity_fingerprint: Option<String>,
}
