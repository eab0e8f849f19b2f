//! The registry artifact.

use super::DocSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Corpus-wide index persisted after a full run.
///
/// Maps are ordered by key so that serialization is a pure function of the
/// value; only `generated_at` changes between runs on unchanged input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// ISO-8601 UTC timestamp of the run.
    pub generated_at: String,
    /// Number of records.
    pub total_docs: usize,
    /// Count per `doc_type` value.
    pub by_type: BTreeMap<String, usize>,
    /// Count per `status` value.
    pub by_status: BTreeMap<String, usize>,
    /// Summaries, newest `created` first.
    pub docs: Vec<DocSummary>,
}
