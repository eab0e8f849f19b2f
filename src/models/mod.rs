//! Data models for docreg.
//!
//! This module contains the core data structures shared by every pass.

mod diagnostic;
mod domain;
mod metadata;
mod record;
mod registry;

pub use diagnostic::{Diagnostic, DiagnosticKind, Location, Severity};
pub use domain::{DocStatus, DocType};
pub use metadata::{MetaValue, Metadata};
pub use record::{DocSummary, Record, SourceDocument, is_staged_path};
pub use registry::Registry;
