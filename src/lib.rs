//! # Docreg
//!
//! Documentation corpus validator and registry generator.
//!
//! Docreg scans a tree of markdown documents, enforces the front-matter schema,
//! flags conflicting canonical documents and near-duplicates arriving through the
//! staging inbox, and writes a machine-readable registry for downstream agents.
//!
//! ## Pipeline
//!
//! ```text
//! SourceDocument ──► MetadataExtractor ──► Record ──┬──► CanonicalUniquenessChecker ──┐
//!                    (+ fingerprints)               ├──► NearDuplicateDetector ────────┤──► Diagnostics
//!                                                   └──► RegistryBuilder ──► registry.json
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use docreg::{DocregConfig, RunMode, ValidationService};
//!
//! let config = DocregConfig::resolve(None)?;
//! let service = ValidationService::new(config);
//! let report = service.run(RunMode::Full)?;
//! if report.has_errors() {
//!     std::process::exit(1);
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

/// Creates a compile-time verified regex wrapped in [`LazyLock`](std::sync::LazyLock).
///
/// Patterns are string literals checked by the unit tests of each module;
/// the `unreachable!()` branch exists only for type checking.
macro_rules! lazy_regex {
    ($pattern:expr) => {
        ::std::sync::LazyLock::new(|| {
            ::regex::Regex::new($pattern).unwrap_or_else(|_| unreachable!())
        })
    };
}

// Module declarations
pub mod cli;
pub mod config;
pub mod fingerprint;
pub mod frontmatter;
pub mod io;
pub mod matching;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use config::{DetectionConfig, DocregConfig, FeatureFlags};
pub use fingerprint::{ContentHasher, NoopSimilarityHasher, SimHasher, SimilarityHasher};
pub use matching::{NoopTitleMatcher, TitleMatcher, TokenSetMatcher};
pub use models::{
    Diagnostic, DiagnosticKind, DocStatus, DocSummary, DocType, Location, MetaValue, Metadata,
    Record, Registry, Severity, SourceDocument,
};
pub use services::{
    CanonicalUniquenessChecker, DocumentScanner, FrontMatterStamper, MetadataExtractor,
    NearDuplicateDetector, RegistryBuilder, RegistryWriter, RunMode, ValidationReport,
    ValidationService,
};

/// Error type for docreg operations.
///
/// Problems found inside individual documents are never raised as `Error`;
/// they are collected as [`Diagnostic`] values. `Error` covers run-level
/// failures only.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Bad CLI values, malformed config values, stamp arguments outside the schema |
/// | `OperationFailed` | Config file unreadable, registry write fails, logging init fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds an `OperationFailed` error from an operation name and any displayable cause.
    pub fn operation(operation: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for docreg operations.
pub type Result<T> = std::result::Result<T, Error>;
