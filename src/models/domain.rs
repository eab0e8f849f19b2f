//! Document type and status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of document a corpus entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Feature or system specification.
    Spec,
    /// Request for comments.
    Rfc,
    /// Architecture decision record.
    Adr,
    /// Implementation or project plan.
    Plan,
    /// Investigation result.
    Finding,
    /// How-to guide.
    Guide,
    /// Terminology list.
    Glossary,
    /// Reference material.
    Reference,
}

impl DocType {
    /// Returns all document types in schema order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Spec,
            Self::Rfc,
            Self::Adr,
            Self::Plan,
            Self::Finding,
            Self::Guide,
            Self::Glossary,
            Self::Reference,
        ]
    }

    /// Returns the document type as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Spec => "spec",
            Self::Rfc => "rfc",
            Self::Adr => "adr",
            Self::Plan => "plan",
            Self::Finding => "finding",
            Self::Guide => "guide",
            Self::Glossary => "glossary",
            Self::Reference => "reference",
        }
    }

    /// Parses a document type. Matching is exact: `Guide` is not `guide`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == s)
    }

    /// Comma-separated list of accepted values, for diagnostics.
    #[must_use]
    pub fn accepted() -> String {
        Self::all()
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    /// Work in progress.
    Draft,
    /// Current and authoritative.
    #[default]
    Active,
    /// Replaced by a newer document.
    Superseded,
    /// Proposal that was declined.
    Rejected,
    /// Retained for history only.
    Archived,
}

impl DocStatus {
    /// Returns all statuses in schema order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Draft,
            Self::Active,
            Self::Superseded,
            Self::Rejected,
            Self::Archived,
        ]
    }

    /// Returns the status as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Superseded => "superseded",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
        }
    }

    /// Parses a status. Matching is exact.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|st| st.as_str() == s)
    }

    /// Comma-separated list of accepted values, for diagnostics.
    #[must_use]
    pub fn accepted() -> String {
        Self::all()
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
