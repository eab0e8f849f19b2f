//! Manifest-driven bulk migration.
//!
//! A manifest lists legacy documents and what to do with each: stamp it in
//! place, stamp it while moving it to a new location, or move it to an
//! archive untouched.
//!
//! ```toml
//! [[migration]]
//! file = "docs/task/README.md"
//! target = "docs/guides/task-runner.md"
//! doc_id = "DOC-2025-00070"
//! title = "Task Runner Guide"
//! tags = ["task", "build"]
//! summary = "Complete guide to using Task."
//!
//! [[migration]]
//! file = "docs/task/TODO.md"
//! action = "archive"
//! target = "docs/archive/task-TODO.md"
//! ```
//!
//! Paths are resolved against the manifest's directory.

use super::stamp::{FrontMatterStamper, StampOutcome, StampRequest};
use crate::frontmatter::YamlFrontMatterParser;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// What a manifest entry does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationAction {
    /// Add a front-matter block, moving the document when `target` is set.
    #[default]
    Stamp,
    /// Move the document to `target` without touching its content.
    Archive,
}

/// One manifest entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationEntry {
    /// Source document.
    pub file: PathBuf,
    /// Destination; required for archiving, optional for stamping.
    pub target: Option<PathBuf>,
    /// Action to take.
    #[serde(default)]
    pub action: MigrationAction,
    /// Document identifier.
    pub doc_id: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Summary.
    pub summary: Option<String>,
    /// Document type; defaults to `guide`.
    pub doc_type: Option<String>,
    /// Status; defaults to `active`.
    pub status: Option<String>,
    /// Canonical flag; defaults to `true`.
    pub canonical: Option<bool>,
    /// Creation date; defaults to today.
    pub created: Option<NaiveDate>,
}

impl MigrationEntry {
    /// Builds the stamp request for this entry.
    fn stamp_request(&self) -> Result<StampRequest> {
        let missing = |field: &str| {
            Error::InvalidInput(format!(
                "Migration for {} is missing '{field}'",
                self.file.display()
            ))
        };
        let doc_id = self.doc_id.clone().ok_or_else(|| missing("doc_id"))?;
        let title = self.title.clone().ok_or_else(|| missing("title"))?;
        let summary = self.summary.clone().ok_or_else(|| missing("summary"))?;

        let mut request = StampRequest::new(doc_id, title)
            .with_doc_type(self.doc_type.as_deref().unwrap_or("guide"))?
            .with_status(self.status.as_deref().unwrap_or("active"))?
            .with_canonical(self.canonical.unwrap_or(true))
            .with_tags(self.tags.clone())
            .with_summary(summary);
        if let Some(created) = self.created {
            request = request.with_created(created);
        }
        Ok(request)
    }
}

/// A parsed migration manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationManifest {
    /// Entries, processed in order.
    #[serde(rename = "migration", default)]
    pub entries: Vec<MigrationEntry>,
}

impl MigrationManifest {
    /// Parses a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid manifest.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::operation("parse_manifest", e))
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| Error::operation("read_manifest", e))?;
        Self::parse(&text)
    }
}

/// Result of a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Front matter added in place.
    Added(PathBuf),
    /// Moved to a new location, stamped when it had no block.
    Moved {
        /// Original location.
        from: PathBuf,
        /// New location.
        to: PathBuf,
    },
    /// Moved to the archive.
    Archived {
        /// Original location.
        from: PathBuf,
        /// Archive location.
        to: PathBuf,
    },
    /// Left alone.
    Skipped {
        /// Document concerned.
        path: PathBuf,
        /// Why it was skipped.
        reason: String,
    },
}

/// Statistics from a migration run.
#[derive(Debug, Clone, Default)]
pub struct MigrationStats {
    /// Documents stamped in place.
    pub added: usize,
    /// Documents moved (and stamped when needed).
    pub moved: usize,
    /// Documents archived.
    pub archived: usize,
    /// Entries skipped.
    pub skipped: usize,
    /// Per-entry outcomes in manifest order.
    pub outcomes: Vec<MigrationOutcome>,
}

impl MigrationStats {
    /// Total entries processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.added + self.moved + self.archived + self.skipped
    }

    fn record(&mut self, outcome: MigrationOutcome) {
        match &outcome {
            MigrationOutcome::Added(_) => self.added += 1,
            MigrationOutcome::Moved { .. } => self.moved += 1,
            MigrationOutcome::Archived { .. } => self.archived += 1,
            MigrationOutcome::Skipped { .. } => self.skipped += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// A checked manifest entry.
enum Step {
    StampInPlace(StampRequest),
    StampAndMove(StampRequest, PathBuf),
    Archive(PathBuf),
}

/// Applies a manifest to the file system.
#[derive(Debug, Clone)]
pub struct BulkMigrator {
    base_dir: PathBuf,
    dry_run: bool,
    stamper: FrontMatterStamper,
}

impl BulkMigrator {
    /// Creates a migrator resolving manifest paths against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            dry_run: false,
            stamper: FrontMatterStamper::new(),
        }
    }

    /// Reports outcomes without touching any file.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs every entry in order.
    ///
    /// All entries are checked before any file is touched, so an invalid
    /// manifest changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid entry or a failed read, write or move.
    #[instrument(skip(self, manifest), fields(entries = manifest.entries.len(), dry_run = self.dry_run))]
    pub fn run(&self, manifest: &MigrationManifest) -> Result<MigrationStats> {
        let steps = manifest
            .entries
            .iter()
            .map(|entry| self.plan(entry))
            .collect::<Result<Vec<_>>>()?;

        let mut stats = MigrationStats::default();
        for (source, step) in steps {
            let outcome = match step {
                Step::StampInPlace(request) => self.stamp_in_place(&request, source)?,
                Step::StampAndMove(request, target) => {
                    self.stamp_and_move(&request, source, target)?
                },
                Step::Archive(target) => self.archive(source, target)?,
            };
            stats.record(outcome);
        }

        tracing::info!(
            added = stats.added,
            moved = stats.moved,
            archived = stats.archived,
            skipped = stats.skipped,
            "Migration finished"
        );
        Ok(stats)
    }

    fn plan(&self, entry: &MigrationEntry) -> Result<(PathBuf, Step)> {
        let source = self.base_dir.join(&entry.file);
        let target = entry.target.as_ref().map(|t| self.base_dir.join(t));
        let step = match (entry.action, target) {
            (MigrationAction::Stamp, None) => Step::StampInPlace(entry.stamp_request()?),
            (MigrationAction::Stamp, Some(target)) => {
                Step::StampAndMove(entry.stamp_request()?, target)
            },
            (MigrationAction::Archive, Some(target)) => Step::Archive(target),
            (MigrationAction::Archive, None) => {
                return Err(Error::InvalidInput(format!(
                    "Archive migration for {} has no target",
                    entry.file.display()
                )));
            },
        };
        Ok((source, step))
    }

    fn stamp_in_place(&self, request: &StampRequest, source: PathBuf) -> Result<MigrationOutcome> {
        if !source.is_file() {
            return Ok(skipped(source, "File not found"));
        }
        match self.stamper.stamp_file(request, &source, self.dry_run)? {
            StampOutcome::Stamped(_) => Ok(MigrationOutcome::Added(source)),
            StampOutcome::AlreadyStamped => Ok(skipped(source, "Already has front-matter")),
        }
    }

    fn stamp_and_move(
        &self,
        request: &StampRequest,
        source: PathBuf,
        target: PathBuf,
    ) -> Result<MigrationOutcome> {
        if !source.is_file() {
            return Ok(skipped(source, "Source not found"));
        }
        if target.exists() {
            return Ok(skipped(target, "Target already exists"));
        }

        let content =
            std::fs::read_to_string(&source).map_err(|e| Error::operation("read_document", e))?;
        if !self.dry_run {
            create_parent(&target)?;
            if YamlFrontMatterParser::has_front_matter(&content) {
                rename(&source, &target)?;
            } else if let StampOutcome::Stamped(updated) = self.stamper.stamp(request, &content)? {
                std::fs::write(&target, updated)
                    .map_err(|e| Error::operation("write_document", e))?;
                std::fs::remove_file(&source)
                    .map_err(|e| Error::operation("remove_document", e))?;
            }
        }
        Ok(MigrationOutcome::Moved {
            from: source,
            to: target,
        })
    }

    fn archive(&self, source: PathBuf, target: PathBuf) -> Result<MigrationOutcome> {
        if !source.is_file() {
            return Ok(skipped(source, "Source not found"));
        }
        if target.exists() {
            return Ok(skipped(target, "Target already exists"));
        }
        if !self.dry_run {
            create_parent(&target)?;
            rename(&source, &target)?;
        }
        Ok(MigrationOutcome::Archived {
            from: source,
            to: target,
        })
    }
}

fn skipped(path: PathBuf, reason: &str) -> MigrationOutcome {
    MigrationOutcome::Skipped {
        path,
        reason: reason.to_string(),
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| Error::operation("create_directory", e))
        },
        _ => Ok(()),
    }
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    std::fs::rename(from, to).map_err(|e| Error::operation("move_document", e))
}
