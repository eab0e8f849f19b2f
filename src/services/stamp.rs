//! Adding a schema block to documents that lack one.

use crate::frontmatter::YamlFrontMatterParser;
use crate::models::{DocStatus, DocType, MetaValue};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::instrument;

/// Field values for a new front-matter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampRequest {
    /// Document identifier.
    pub doc_id: String,
    /// Title.
    pub title: String,
    /// Document type.
    pub doc_type: DocType,
    /// Lifecycle status.
    pub status: DocStatus,
    /// Canonical flag.
    pub canonical: bool,
    /// Creation date.
    pub created: NaiveDate,
    /// Tags.
    pub tags: Vec<String>,
    /// One-line summary.
    pub summary: String,
}

impl StampRequest {
    /// Creates a request with the migration defaults: a canonical, active
    /// guide created today.
    pub fn new(doc_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            title: title.into(),
            doc_type: DocType::Guide,
            status: DocStatus::Active,
            canonical: true,
            created: chrono::Local::now().date_naive(),
            tags: Vec::new(),
            summary: String::new(),
        }
    }

    /// Sets the document type from its schema name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a value outside the enumeration.
    pub fn with_doc_type(mut self, doc_type: &str) -> Result<Self> {
        self.doc_type = DocType::parse(doc_type).ok_or_else(|| {
            Error::InvalidInput(format!(
                "Invalid doc_type '{doc_type}'. Must be one of: {}",
                DocType::accepted()
            ))
        })?;
        Ok(self)
    }

    /// Sets the status from its schema name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a value outside the enumeration.
    pub fn with_status(mut self, status: &str) -> Result<Self> {
        self.status = DocStatus::parse(status).ok_or_else(|| {
            Error::InvalidInput(format!(
                "Invalid status '{status}'. Must be one of: {}",
                DocStatus::accepted()
            ))
        })?;
        Ok(self)
    }

    /// Sets the canonical flag.
    #[must_use]
    pub const fn with_canonical(mut self, canonical: bool) -> Self {
        self.canonical = canonical;
        self
    }

    /// Sets the creation date.
    #[must_use]
    pub const fn with_created(mut self, created: NaiveDate) -> Self {
        self.created = created;
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Fields in schema order.
    fn fields(&self) -> Vec<(&'static str, MetaValue)> {
        vec![
            ("doc_id", MetaValue::String(self.doc_id.clone())),
            ("title", MetaValue::String(self.title.clone())),
            ("doc_type", MetaValue::String(self.doc_type.as_str().to_string())),
            ("status", MetaValue::String(self.status.as_str().to_string())),
            ("canonical", MetaValue::Bool(self.canonical)),
            ("created", MetaValue::Date(self.created)),
            (
                "tags",
                MetaValue::Sequence(self.tags.iter().cloned().map(MetaValue::String).collect()),
            ),
            ("summary", MetaValue::String(self.summary.clone())),
        ]
    }
}

/// What stamping did to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampOutcome {
    /// A block was added; holds the new content.
    Stamped(String),
    /// The document already opens with a marker and was left alone.
    AlreadyStamped,
}

/// Prepends a front-matter block to documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontMatterStamper;

impl FrontMatterStamper {
    /// Creates a stamper.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Stamps `content` in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the block cannot be serialized.
    pub fn stamp(&self, request: &StampRequest, content: &str) -> Result<StampOutcome> {
        if YamlFrontMatterParser::has_front_matter(content) {
            return Ok(StampOutcome::AlreadyStamped);
        }
        let fields = request.fields();
        YamlFrontMatterParser::serialize(&fields, content).map(StampOutcome::Stamped)
    }

    /// Stamps the file at `path`, writing it back unless `dry_run` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    #[instrument(skip(self, request), fields(path = %path.display(), doc_id = %request.doc_id))]
    pub fn stamp_file(
        &self,
        request: &StampRequest,
        path: &Path,
        dry_run: bool,
    ) -> Result<StampOutcome> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::operation("read_document", e))?;

        let outcome = self.stamp(request, &content)?;
        match &outcome {
            StampOutcome::Stamped(updated) if !dry_run => {
                std::fs::write(path, updated).map_err(|e| Error::operation("write_document", e))?;
                tracing::info!("Front matter added");
            },
            StampOutcome::Stamped(_) => tracing::debug!("Dry run, not writing"),
            StampOutcome::AlreadyStamped => tracing::info!("Skipping, front matter present"),
        }
        Ok(outcome)
    }
}
