//! Rendering validation reports.

use crate::models::{Diagnostic, Registry, Severity};
use crate::services::{MigrationOutcome, MigrationStats, ValidationReport};
use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

/// Output format for the validate command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text grouped by severity (default).
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

impl FromStr for ReportFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        })
    }
}

/// JSON form of a report.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    diagnostics: &'a [Diagnostic],
    errors: usize,
    warnings: usize,
    infos: usize,
    registry_written: bool,
    total_docs: usize,
}

/// Writes diagnostics grouped by severity, followed by the summary line.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_text<W: Write>(writer: &mut W, report: &ValidationReport) -> io::Result<()> {
    if report.diagnostics.is_empty() {
        writeln!(writer, "All documentation validated successfully!")?;
        return Ok(());
    }

    for severity in Severity::all() {
        let group: Vec<&Diagnostic> = report
            .diagnostics
            .iter()
            .filter(|d| d.severity == *severity)
            .collect();
        if group.is_empty() {
            continue;
        }
        writeln!(
            writer,
            "{}S ({}):",
            severity.as_str().to_uppercase(),
            group.len()
        )?;
        for diagnostic in group {
            writeln!(writer, "  {diagnostic}")?;
        }
        writeln!(writer)?;
    }

    if report.has_errors() {
        writeln!(writer, "Validation failed.")?;
    } else {
        writeln!(writer, "Warnings found but validation passed.")?;
    }
    Ok(())
}

/// Writes the report as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(
    writer: &mut W,
    report: &ValidationReport,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&JsonReport {
        diagnostics: &report.diagnostics,
        errors: report.count(Severity::Error),
        warnings: report.count(Severity::Warning),
        infos: report.count(Severity::Info),
        registry_written: report.registry_written(),
        total_docs: report.registry.total_docs,
    })?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Writes registry statistics after a full run.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_stats<W: Write>(
    writer: &mut W,
    registry: &Registry,
    path: &std::path::Path,
) -> io::Result<()> {
    writeln!(writer, "Registry generated: {}", path.display())?;
    writeln!(writer, "   Total docs: {}", registry.total_docs)?;
    writeln!(writer, "   By type: {}", render_counts(&registry.by_type))?;
    writeln!(writer, "   By status: {}", render_counts(&registry.by_status))?;
    Ok(())
}

fn render_counts(counts: &std::collections::BTreeMap<String, usize>) -> String {
    let entries: Vec<String> = counts.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    format!("{{{}}}", entries.join(", "))
}

/// Renders a full report to a string.
///
/// Text output includes the registry statistics when the registry was written.
#[must_use]
pub fn render_report(report: &ValidationReport, format: ReportFormat) -> String {
    let mut buf = Vec::new();
    let written = match format {
        ReportFormat::Text => {
            let stats = match &report.registry_path {
                Some(path) => write_stats(&mut buf, &report.registry, path)
                    .and_then(|()| writeln!(buf)),
                None => writeln!(buf, "(Check-only mode: skipping registry regeneration)")
                    .and_then(|()| writeln!(buf)),
            };
            stats.is_ok() && write_text(&mut buf, report).is_ok()
        },
        ReportFormat::Json => write_json(&mut buf, report).is_ok(),
    };
    if !written {
        tracing::warn!("Report rendering incomplete");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Writes one line per migration entry, then the totals.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_migration<W: Write>(writer: &mut W, stats: &MigrationStats) -> io::Result<()> {
    for outcome in &stats.outcomes {
        match outcome {
            MigrationOutcome::Added(path) => {
                writeln!(writer, "  [OK] Added front-matter: {}", path.display())?;
            },
            MigrationOutcome::Moved { from, to } => {
                writeln!(writer, "  [MOVE] {} -> {}", from.display(), to.display())?;
            },
            MigrationOutcome::Archived { from, to } => {
                writeln!(writer, "  [ARCHIVE] {} -> {}", from.display(), to.display())?;
            },
            MigrationOutcome::Skipped { path, reason } => {
                writeln!(writer, "  [SKIP] {reason}: {}", path.display())?;
            },
        }
    }
    writeln!(writer)?;
    writeln!(writer, "Migration complete!")?;
    writeln!(writer, "  Added front-matter: {}", stats.added)?;
    writeln!(writer, "  Moved and migrated: {}", stats.moved)?;
    writeln!(writer, "  Archived: {}", stats.archived)?;
    writeln!(writer, "  Skipped: {}", stats.skipped)?;
    writeln!(writer, "  Total processed: {}", stats.total())
}

/// Renders migration results as text.
#[must_use]
pub fn render_migration(stats: &MigrationStats) -> String {
    let mut buf = Vec::new();
    if write_migration(&mut buf, stats).is_err() {
        tracing::warn!("Migration summary rendering incomplete");
    }
    String::from_utf8_lossy(&buf).into_owned()
}
