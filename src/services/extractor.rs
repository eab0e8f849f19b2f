//! Front-matter extraction and schema validation.

use crate::frontmatter::YamlFrontMatterParser;
use crate::models::{
    Diagnostic, DiagnosticKind, DocStatus, DocType, MetaValue, Metadata, is_staged_path,
};
use crate::Error;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// Fields every schema-bound document must carry, in schema order.
pub const REQUIRED_FIELDS: &[&str] = &[
    "doc_id", "title", "doc_type", "status", "canonical", "created", "tags", "summary",
];

/// `PREFIX-YYYY-NNNNN`, e.g. `DOC-2025-00042`.
static DOC_ID_PATTERN: LazyLock<Regex> = lazy_regex!(r"\A[A-Z]+-[0-9]{4}-[0-9]{5}\z");

/// Result of extracting one document.
#[derive(Debug)]
pub struct Extraction<'a> {
    /// Parsed metadata; `None` when the document has no front-matter block.
    ///
    /// A block that fails to parse still yields `Some` (empty) metadata so
    /// that the document keeps its place in the registry.
    pub metadata: Option<Metadata>,
    /// Text after the block, or the whole document when there is no block.
    pub body: &'a str,
    /// Problems found while extracting and validating.
    pub diagnostics: Vec<Diagnostic>,
}

/// Splits the front-matter block from the body and validates it.
///
/// Pure with respect to its input: the only output besides the extraction
/// itself is the list of diagnostics.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    staging_dir: String,
}

impl MetadataExtractor {
    /// Creates an extractor; documents under `staging_dir` may omit front matter.
    pub fn new(staging_dir: impl Into<String>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
        }
    }

    /// Extracts and validates the front matter of `text`.
    pub fn extract<'a>(&self, path: &str, text: &'a str) -> Extraction<'a> {
        let Some(block) = YamlFrontMatterParser::locate(text) else {
            let mut diagnostics = Vec::new();
            if !is_staged_path(path, &self.staging_dir) {
                diagnostics.push(Diagnostic::warning(
                    path,
                    DiagnosticKind::MissingFrontMatter,
                    "Missing YAML front-matter. See docs/DOCUMENTATION-SCHEMA.md",
                ));
            }
            return Extraction {
                metadata: None,
                body: text,
                diagnostics,
            };
        };

        match YamlFrontMatterParser::parse_block(block.yaml) {
            Ok(metadata) => {
                let diagnostics = validate(path, &metadata);
                Extraction {
                    metadata: Some(metadata),
                    body: block.body,
                    diagnostics,
                }
            },
            Err(e) => {
                let message = match e {
                    Error::InvalidInput(msg) => msg,
                    other => other.to_string(),
                };
                Extraction {
                    metadata: Some(Metadata::new()),
                    body: block.body,
                    diagnostics: vec![Diagnostic::error(
                        path,
                        DiagnosticKind::SchemaParseFailure,
                        message,
                    )],
                }
            },
        }
    }
}

/// Validates parsed front matter against the schema.
#[must_use]
pub fn validate(path: &str, meta: &Metadata) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !meta.contains(field))
        .collect();
    if !missing.is_empty() {
        diagnostics.push(Diagnostic::error(
            path,
            DiagnosticKind::SchemaViolation,
            format!("Missing required fields: {}", missing.join(", ")),
        ));
    }

    if let Some(value) = meta.get("doc_type") {
        if value.as_text().and_then(|s| DocType::parse(&s)).is_none() {
            diagnostics.push(Diagnostic::error(
                path,
                DiagnosticKind::SchemaViolation,
                format!(
                    "Invalid doc_type '{value}'. Must be one of: {}",
                    DocType::accepted()
                ),
            ));
        }
    }

    if let Some(value) = meta.get("status") {
        if value.as_text().and_then(|s| DocStatus::parse(&s)).is_none() {
            diagnostics.push(Diagnostic::error(
                path,
                DiagnosticKind::SchemaViolation,
                format!(
                    "Invalid status '{value}'. Must be one of: {}",
                    DocStatus::accepted()
                ),
            ));
        }
    }

    if let Some(value) = meta.get("canonical") {
        if value.as_bool().is_none() {
            diagnostics.push(Diagnostic::error(
                path,
                DiagnosticKind::SchemaViolation,
                format!("Field 'canonical' must be boolean, got: {}", value.kind_name()),
            ));
        }
    }

    if let Some(value) = meta.get("created") {
        if !is_iso_date(value) {
            diagnostics.push(Diagnostic::error(
                path,
                DiagnosticKind::SchemaViolation,
                format!("Field 'created' must be ISO date (YYYY-MM-DD), got: {value}"),
            ));
        }
    }

    if let Some(value) = meta.get("tags") {
        if !value.is_sequence() {
            diagnostics.push(Diagnostic::error(
                path,
                DiagnosticKind::SchemaViolation,
                format!("Field 'tags' must be a list, got: {}", value.kind_name()),
            ));
        }
    }

    if let Some(value) = meta.get("doc_id") {
        let doc_id = value.to_string();
        if !DOC_ID_PATTERN.is_match(&doc_id) {
            diagnostics.push(Diagnostic::warning(
                path,
                DiagnosticKind::IdentifierFormat,
                format!(
                    "Invalid doc_id format '{doc_id}'. Expected: PREFIX-YYYY-NNNNN (e.g., DOC-2025-00042)"
                ),
            ));
        }
    }

    diagnostics
}

/// Accepts calendar dates and ISO date-times.
fn is_iso_date(value: &MetaValue) -> bool {
    match value {
        MetaValue::Date(_) => true,
        MetaValue::String(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
                || DateTime::parse_from_rfc3339(s).is_ok()
        },
        _ => false,
    }
}
