//! Core data models used by the library.

/// One FAQ source line as stored in the vector index.
///
/// `id` is the 0-based line number in the source file, so re-ingesting the
/// same file overwrites points instead of duplicating them.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedDocument {
    pub id: u64,
    /// Embedded text: the answer of a `question:answer` line, or the whole line.
    pub text: String,
    /// Question half of the line; empty for lines without a colon.
    pub question: String,
}

/// Nearest document for a query.
#[derive(Clone, Debug, PartialEq)]
pub struct TopMatch {
    pub document: String,
    pub question: String,
    /// Lower is more similar (cosine: `0.0` identical, `2.0` opposite).
    pub distance: f32,
}

/// Outcome of an ingestion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents handed to the ingester.
    pub documents: usize,
    /// Points acknowledged by Qdrant.
    pub upserted: usize,
    /// Vector dimension the collection was ensured with.
    pub dimension: usize,
}
