//! Document source abstraction.

use crate::Result;
use crate::models::SourceDocument;

/// Anything that can enumerate the documents of a corpus.
///
/// Implementations read every document up front; the pipeline performs no
/// I/O after enumeration.
pub trait DocumentSource {
    /// Enumerates documents in a deterministic order.
    ///
    /// Per-document read problems are carried inside the returned
    /// [`SourceDocument`] values rather than failing the whole enumeration.
    ///
    /// # Errors
    ///
    /// Returns an error if the corpus itself cannot be enumerated.
    fn documents(&self) -> Result<Vec<SourceDocument>>;
}
