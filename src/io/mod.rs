//! Corpus input.
//!
//! The validation pipeline consumes a sequence of [`SourceDocument`]s; this
//! module produces them.
//!
//! - [`DocumentSource`] is the seam the pipeline reads through
//! - [`CorpusWalker`] enumerates markdown files on disk
//!
//! [`SourceDocument`]: crate::models::SourceDocument

mod traits;
mod walker;

pub use traits::DocumentSource;
pub use walker::CorpusWalker;
