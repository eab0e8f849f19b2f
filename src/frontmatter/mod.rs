//! YAML front matter parsing.
//!
//! Front matter format (bit-exact):
//! ```text
//! ---
//! doc_id: DOC-2025-00042
//! title: Spec Kit Guide
//! tags: [spec-kit, workflow]
//! ---
//! The document body.
//! ```
//!
//! The opening marker must be the very first line of the document and the
//! closing marker line must be followed by a line break. Anything else is
//! treated as a document without front matter.

mod parser;

pub use parser::{FrontMatterBlock, YamlFrontMatterParser};
