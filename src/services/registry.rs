//! Registry aggregation and persistence.

use crate::models::{Record, Registry};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::instrument;

/// Bucket for records with an empty `doc_type` or `status`.
pub const UNKNOWN_BUCKET: &str = "unknown";

/// Builds a [`Registry`] from scanned records.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryBuilder;

impl RegistryBuilder {
    /// Creates a builder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Aggregates records into a registry stamped with `generated_at`.
    ///
    /// Documents are ordered by their `created` text, newest first. The sort
    /// is stable: records with equal dates keep their input order.
    #[must_use]
    pub fn build(&self, records: &[Record], generated_at: DateTime<Utc>) -> Registry {
        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_status: BTreeMap<String, usize> = BTreeMap::new();

        let mut docs: Vec<_> = records.iter().map(Record::summary).collect();
        for doc in &docs {
            *by_type.entry(bucket(&doc.doc_type)).or_default() += 1;
            *by_status.entry(bucket(&doc.status)).or_default() += 1;
        }
        docs.sort_by(|a, b| b.created.cmp(&a.created));

        Registry {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            total_docs: docs.len(),
            by_type,
            by_status,
            docs,
        }
    }
}

fn bucket(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN_BUCKET.to_string()
    } else {
        value.to_string()
    }
}

/// Serializes and persists registries.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryWriter;

impl RegistryWriter {
    /// Creates a writer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders the registry as pretty-printed JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self, registry: &Registry) -> Result<String> {
        let mut json = serde_json::to_string_pretty(registry)
            .map_err(|e| Error::operation("serialize_registry", e))?;
        json.push('\n');
        Ok(json)
    }

    /// Writes the registry to `path`, creating parent directories and
    /// replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    #[instrument(skip(self, registry), fields(path = %path.display(), docs = registry.total_docs))]
    pub fn write(&self, registry: &Registry, path: &Path) -> Result<()> {
        let json = self.serialize(registry)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::operation("create_registry_dir", e))?;
        }
        std::fs::write(path, json).map_err(|e| Error::operation("write_registry", e))?;
        tracing::info!("Registry written");
        Ok(())
    }

    /// Reads a registry back from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a registry.
    pub fn read(&self, path: &Path) -> Result<Registry> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::operation("read_registry", e))?;
        serde_json::from_str(&contents).map_err(|e| Error::operation("parse_registry", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetaValue, Metadata};
    use chrono::TimeZone;

    fn record(path: &str, doc_type: &str, status: &str, created: &str) -> Record {
        let mut metadata = Metadata::new().with("title", MetaValue::String(path.to_string()));
        if !doc_type.is_empty() {
            metadata.insert("doc_type", MetaValue::String(doc_type.to_string()));
        }
        if !status.is_empty() {
            metadata.insert("status", MetaValue::String(status.to_string()));
        }
        if !created.is_empty() {
            metadata.insert("created", MetaValue::String(created.to_string()));
        }
        Record {
            path: path.to_string(),
            metadata,
            content_hash: "0".repeat(64),
            similarity_fingerprint: Some(1),
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 7, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn test_counts_and_unknown_bucket() {
        let records = vec![
            record("docs/a.md", "guide", "active", "2025-01-01"),
            record("docs/b.md", "guide", "draft", "2025-02-01"),
            record("docs/c.md", "", "", "2025-03-01"),
        ];
        let registry = RegistryBuilder::new().build(&records, fixed_time());

        assert_eq!(registry.total_docs, 3);
        assert_eq!(registry.by_type.get("guide"), Some(&2));
        assert_eq!(registry.by_type.get("unknown"), Some(&1));
        assert_eq!(registry.by_status.get("active"), Some(&1));
        assert_eq!(registry.by_status.get("unknown"), Some(&1));
        assert_eq!(registry.by_type.values().sum::<usize>(), 3);
        assert_eq!(registry.by_status.values().sum::<usize>(), 3);
        assert_eq!(registry.generated_at, "2025-10-07T12:00:00.000000Z");
    }

    #[test]
    fn test_docs_sorted_newest_first_stable() {
        let records = vec![
            record("docs/old.md", "guide", "active", "2024-12-31"),
            record("docs/tie-1.md", "guide", "active", "2025-06-01"),
            record("docs/new.md", "guide", "active", "2025-09-01"),
            record("docs/tie-2.md", "guide", "active", "2025-06-01"),
            record("docs/undated.md", "guide", "active", ""),
        ];
        let registry = RegistryBuilder::new().build(&records, fixed_time());
        let paths: Vec<&str> = registry.docs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "docs/new.md",
                "docs/tie-1.md",
                "docs/tie-2.md",
                "docs/old.md",
                "docs/undated.md"
            ]
        );
    }

    #[test]
    fn test_empty_corpus() {
        let registry = RegistryBuilder::new().build(&[], fixed_time());
        assert_eq!(registry.total_docs, 0);
        assert!(registry.by_type.is_empty());
        assert!(registry.docs.is_empty());
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let records = vec![
            record("docs/a.md", "rfc", "draft", "2025-01-01"),
            record("docs/b.md", "adr", "active", "2025-01-02"),
        ];
        let writer = RegistryWriter::new();
        let first = writer
            .serialize(&RegistryBuilder::new().build(&records, fixed_time()))
            .unwrap();
        let second = writer
            .serialize(&RegistryBuilder::new().build(&records, fixed_time()))
            .unwrap();

        assert_eq!(first, second);
        assert!(first.ends_with("}\n"));
        // Keys in declaration order, maps sorted.
        assert!(first.find("\"generated_at\"") < first.find("\"total_docs\""));
        assert!(first.find("\"adr\"") < first.find("\"rfc\""));
    }

    #[test]
    fn test_write_creates_parent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index").join("registry.json");
        let writer = RegistryWriter::new();

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale").unwrap();

        let registry = RegistryBuilder::new().build(
            &[record("docs/a.md", "guide", "active", "2025-01-01")],
            fixed_time(),
        );
        writer.write(&registry, &path).unwrap();

        let read_back = writer.read(&path).unwrap();
        assert_eq!(read_back, registry);
    }
}
