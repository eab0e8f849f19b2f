//! Front-matter values and the metadata map.
//!
//! YAML front matter is arbitrary structured data. Rather than coercing it into
//! a struct (which would turn a wrong-typed field into a parse failure), each
//! value is kept as a [`MetaValue`] and validated by explicit kind checks.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// A single front-matter value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// Explicit `null` or an empty value.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Integer scalar.
    Integer(i64),
    /// Floating point scalar.
    Float(f64),
    /// String scalar.
    String(String),
    /// Scalar in `YYYY-MM-DD` form.
    Date(NaiveDate),
    /// Ordered sequence.
    Sequence(Vec<MetaValue>),
    /// Nested mapping, in document order.
    Mapping(Vec<(String, MetaValue)>),
}

impl MetaValue {
    /// Name of the value's kind, as reported in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Renders a scalar as text. Returns `None` for null, sequences and mappings.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Self::Null | Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }

    /// Returns the boolean when the value is strictly a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns true for a sequence value.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Sequence(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            },
            Self::Mapping(entries) => {
                let rendered: Vec<String> =
                    entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", rendered.join(", "))
            },
            scalar => write!(f, "{}", scalar.as_text().unwrap_or_default()),
        }
    }
}

/// Parsed front-matter of one document, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    fields: BTreeMap<String, MetaValue>,
}

impl Metadata {
    /// Creates empty metadata (used when the block fails to parse).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        self.fields.insert(key.into(), value);
    }

    /// Builder form of [`Metadata::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: MetaValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Looks up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.fields.get(key)
    }

    /// Returns true when the field is present (even if null).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns true when there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Scalar field rendered as text, or empty string when absent or not a scalar.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.get(key)
            .and_then(MetaValue::as_text)
            .unwrap_or_default()
    }

    /// Sequence field rendered as a list of strings.
    ///
    /// Non-scalar items are skipped. A missing or non-sequence field yields an
    /// empty list.
    #[must_use]
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(MetaValue::Sequence(items)) => {
                items.iter().filter_map(MetaValue::as_text).collect()
            },
            _ => Vec::new(),
        }
    }

    /// Whether the `canonical` field is the boolean `true`.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.get("canonical")
            .and_then(MetaValue::as_bool)
            .unwrap_or(false)
    }
}

impl FromIterator<(String, MetaValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, MetaValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
