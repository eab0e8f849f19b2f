//! Diagnostics produced by validation and detection passes.

use serde::{Serialize, Serializer};
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fails the run.
    Error,
    /// Reported, does not fail the run.
    Warning,
    /// Informational.
    Info,
}

impl Severity {
    /// Severities in reporting order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Error, Self::Warning, Self::Info]
    }

    /// Returns the severity as a lowercase string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of problem a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Document bytes could not be read or decoded.
    ReadFailure,
    /// Document has no front-matter block.
    MissingFrontMatter,
    /// Front-matter block present but not valid YAML mapping.
    SchemaParseFailure,
    /// Required field missing or of the wrong kind/value.
    SchemaViolation,
    /// `doc_id` does not follow `PREFIX-YYYY-NNNNN`.
    IdentifierFormat,
    /// More than one canonical document for the same concept.
    CanonicalConflict,
    /// Staged document resembles an established one.
    NearDuplicate,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Cross-document issue.
    Corpus,
    /// A single document, by corpus-relative path.
    Document(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corpus => write!(f, "."),
            Self::Document(path) => write!(f, "{path}"),
        }
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One detected problem. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Document or corpus the diagnostic concerns.
    pub location: Location,
    /// Human-readable description.
    pub message: String,
    /// Severity.
    pub severity: Severity,
    /// Category.
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(
        location: Location,
        kind: DiagnosticKind,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            location,
            message: message.into(),
            severity,
            kind,
        }
    }

    /// Error about a single document.
    pub fn error(path: &str, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(
            Location::Document(path.to_string()),
            kind,
            Severity::Error,
            message,
        )
    }

    /// Warning about a single document.
    pub fn warning(path: &str, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(
            Location::Document(path.to_string()),
            kind,
            Severity::Warning,
            message,
        )
    }

    /// Whether this diagnostic fails the run.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity.as_str().to_uppercase(),
            self.location,
            self.message
        )
    }
}
