//! Locating, parsing and writing the front-matter block.

use crate::models::{MetaValue, Metadata};
use crate::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde_yaml_ng::{Mapping, Value};
use std::sync::LazyLock;

/// Marker line, block, marker line, at the very start of the document.
static BLOCK_PATTERN: LazyLock<Regex> = lazy_regex!(r"(?s)\A---\r?\n(.*?)\r?\n---\r?\n");

/// Plain calendar date scalar.
static DATE_PATTERN: LazyLock<Regex> = lazy_regex!(r"\A\d{4}-\d{2}-\d{2}\z");

/// A located front-matter block, borrowed from the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatterBlock<'a> {
    /// YAML text between the markers.
    pub yaml: &'a str,
    /// Everything after the closing marker line.
    pub body: &'a str,
}

/// Parser for YAML front matter in markdown documents.
pub struct YamlFrontMatterParser;

impl YamlFrontMatterParser {
    /// The front matter delimiter.
    pub const DELIMITER: &'static str = "---";

    /// Locates the front-matter block.
    ///
    /// Returns `None` when the document does not start with a complete block.
    #[must_use]
    pub fn locate(content: &str) -> Option<FrontMatterBlock<'_>> {
        let captures = BLOCK_PATTERN.captures(content)?;
        let whole = captures.get(0)?;
        let yaml = captures.get(1)?.as_str();
        Some(FrontMatterBlock {
            yaml,
            body: &content[whole.end()..],
        })
    }

    /// Parses the YAML of a located block into [`Metadata`].
    ///
    /// An empty block yields empty metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the YAML is malformed or its top
    /// level is not a mapping.
    pub fn parse_block(yaml: &str) -> Result<Metadata> {
        let value: Value = serde_yaml_ng::from_str(yaml)
            .map_err(|e| Error::InvalidInput(format!("YAML parse error: {e}")))?;

        match value {
            Value::Null => Ok(Metadata::new()),
            Value::Mapping(mapping) => Ok(mapping
                .into_iter()
                .map(|(k, v)| (key_text(k), to_meta_value(v)))
                .collect()),
            other => Err(Error::InvalidInput(format!(
                "YAML parse error: front matter must be a mapping, got {}",
                to_meta_value(other).kind_name()
            ))),
        }
    }

    /// Returns true when the trimmed content already opens with a marker.
    ///
    /// Looser than [`Self::locate`]: used to avoid stamping a second block
    /// onto a document whose existing block is malformed.
    #[must_use]
    pub fn has_front_matter(content: &str) -> bool {
        content.trim_start().starts_with(Self::DELIMITER)
    }

    /// Serializes fields (in the given order) as a block and prepends it to `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if YAML serialization fails.
    pub fn serialize(fields: &[(&str, MetaValue)], content: &str) -> Result<String> {
        let mut mapping = Mapping::new();
        for (key, value) in fields {
            mapping.insert(Value::String((*key).to_string()), to_yaml_value(value));
        }

        let yaml = serde_yaml_ng::to_string(&Value::Mapping(mapping))
            .map_err(|e| Error::operation("serialize_yaml", e))?;

        Ok(format!(
            "{delim}\n{yaml}{delim}\n\n{content}",
            delim = Self::DELIMITER
        ))
    }
}

fn key_text(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => {
            let meta = to_meta_value(other);
            meta.as_text().unwrap_or_else(|| meta.to_string())
        },
    }
}

fn to_meta_value(value: Value) -> MetaValue {
    match value {
        Value::Null => MetaValue::Null,
        Value::Bool(b) => MetaValue::Bool(b),
        Value::Number(n) => n
            .as_i64()
            .map(MetaValue::Integer)
            .or_else(|| n.as_f64().map(MetaValue::Float))
            .unwrap_or(MetaValue::Null),
        Value::String(s) => parse_date(&s).map_or(MetaValue::String(s), MetaValue::Date),
        Value::Sequence(items) => MetaValue::Sequence(items.into_iter().map(to_meta_value).collect()),
        Value::Mapping(mapping) => MetaValue::Mapping(
            mapping
                .into_iter()
                .map(|(k, v)| (key_text(k), to_meta_value(v)))
                .collect(),
        ),
        Value::Tagged(tagged) => to_meta_value(tagged.value),
    }
}

fn to_yaml_value(value: &MetaValue) -> Value {
    match value {
        MetaValue::Null => Value::Null,
        MetaValue::Bool(b) => Value::Bool(*b),
        MetaValue::Integer(i) => Value::Number((*i).into()),
        MetaValue::Float(f) => Value::Number((*f).into()),
        MetaValue::String(s) => Value::String(s.clone()),
        MetaValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        MetaValue::Sequence(items) => Value::Sequence(items.iter().map(to_yaml_value).collect()),
        MetaValue::Mapping(entries) => {
            let mut mapping = Mapping::new();
            for (k, v) in entries {
                mapping.insert(Value::String(k.clone()), to_yaml_value(v));
            }
            Value::Mapping(mapping)
        },
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if !DATE_PATTERN.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
