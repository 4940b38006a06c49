//! Ingestion pipeline: embed FAQ documents → ensure collection → upsert into Qdrant.
//!
//! Point ids are the documents' line numbers, so running the job twice over
//! the same file overwrites instead of duplicating.

use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::config::{RagConfig, VectorSpace};
use crate::embed::EmbeddingsProvider;
use crate::embed_pool::embed_documents;
use crate::errors::RagError;
use crate::qdrant_facade::{QdrantFacade, document_point};
use crate::record::{IndexedDocument, IngestReport};

/// Write side of the vector index.
pub(crate) trait IndexWriter: Send + Sync {
    /// Creates the collection for `space` unless it already exists.
    fn create_if_missing<'a>(&'a self, space: &'a VectorSpace) -> BoxFuture<'a, Result<(), RagError>>;

    /// Upserts one batch and returns the number of points written.
    fn write_batch<'a>(
        &'a self,
        batch: Vec<(&'a IndexedDocument, Vec<f32>)>,
    ) -> BoxFuture<'a, Result<usize, RagError>>;
}

impl IndexWriter for QdrantFacade {
    fn create_if_missing<'a>(&'a self, space: &'a VectorSpace) -> BoxFuture<'a, Result<(), RagError>> {
        Box::pin(self.ensure_collection(space))
    }

    fn write_batch<'a>(
        &'a self,
        batch: Vec<(&'a IndexedDocument, Vec<f32>)>,
    ) -> BoxFuture<'a, Result<usize, RagError>> {
        let points = batch
            .into_iter()
            .map(|(doc, v)| document_point(doc, v))
            .collect();
        Box::pin(self.upsert_points(points))
    }
}

/// Embeds and upserts `docs` in batches of `cfg.upsert_batch`.
///
/// # Errors
/// Returns embedding errors, vector size mismatches, or Qdrant failures.
pub(crate) async fn ingest_documents(
    cfg: &RagConfig,
    writer: &dyn IndexWriter,
    provider: &dyn EmbeddingsProvider,
    docs: &[IndexedDocument],
) -> Result<IngestReport, RagError> {
    if docs.is_empty() {
        debug!("No documents to ingest");
        return Ok(IngestReport::default());
    }

    let vectors = embed_documents(
        docs,
        provider,
        cfg.embedding_dim,
        cfg.embedding_concurrency,
    )
    .await?;

    let dimension = vectors.first().map(Vec::len).unwrap_or_default();
    debug!("Vector size determined: {}", dimension);

    writer
        .create_if_missing(&VectorSpace {
            size: dimension,
            distance: cfg.distance,
        })
        .await?;

    let mut upserted = 0;
    let batch_size = cfg.upsert_batch.max(1);
    let mut pairs = docs.iter().zip(vectors).peekable();
    while pairs.peek().is_some() {
        let batch: Vec<_> = pairs.by_ref().take(batch_size).collect();
        upserted += writer.write_batch(batch).await?;
    }

    info!(
        documents = docs.len(),
        upserted,
        dimension,
        "Ingested documents into '{}'",
        cfg.collection
    );
    Ok(IngestReport {
        documents: docs.len(),
        upserted,
        dimension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Embeds every text as `[len, 1.0, 0.0]`.
    struct FixedEmbedder;

    impl EmbeddingsProvider for FixedEmbedder {
        fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
            Box::pin(async move { Ok(vec![text.len() as f32, 1.0, 0.0]) })
        }
    }

    struct Unreachable;

    impl EmbeddingsProvider for Unreachable {
        fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
            Box::pin(async { Err(RagError::Embedding("should not be called".into())) })
        }
    }

    /// Records the collection space and the ids of each written batch.
    #[derive(Default)]
    struct RecordingWriter {
        spaces: Mutex<Vec<usize>>,
        batches: Mutex<Vec<Vec<u64>>>,
    }

    impl IndexWriter for RecordingWriter {
        fn create_if_missing<'a>(
            &'a self,
            space: &'a VectorSpace,
        ) -> BoxFuture<'a, Result<(), RagError>> {
            Box::pin(async move {
                self.spaces.lock().unwrap().push(space.size);
                Ok(())
            })
        }

        fn write_batch<'a>(
            &'a self,
            batch: Vec<(&'a IndexedDocument, Vec<f32>)>,
        ) -> BoxFuture<'a, Result<usize, RagError>> {
            Box::pin(async move {
                let n = batch.len();
                self.batches
                    .lock()
                    .unwrap()
                    .push(batch.into_iter().map(|(d, _)| d.id).collect());
                Ok(n)
            })
        }
    }

    fn doc(id: u64, text: &str) -> IndexedDocument {
        IndexedDocument {
            id,
            text: text.into(),
            question: String::new(),
        }
    }

    #[tokio::test]
    async fn empty_input_touches_nothing() {
        let cfg = RagConfig::new_default("http://127.0.0.1:1", "faq");
        let writer = RecordingWriter::default();
        let report = ingest_documents(&cfg, &writer, &Unreachable, &[]).await.unwrap();
        assert_eq!(report, IngestReport::default());
        assert!(writer.spaces.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upserts_in_configured_batches() {
        let mut cfg = RagConfig::new_default("http://127.0.0.1:1", "faq");
        cfg.upsert_batch = 2;
        let docs = vec![doc(0, "a"), doc(2, "bb"), doc(3, "ccc"), doc(7, "d"), doc(8, "e")];

        let writer = RecordingWriter::default();
        let report = ingest_documents(&cfg, &writer, &FixedEmbedder, &docs).await.unwrap();

        assert_eq!(
            report,
            IngestReport {
                documents: 5,
                upserted: 5,
                dimension: 3,
            }
        );
        assert_eq!(*writer.spaces.lock().unwrap(), vec![3]);
        assert_eq!(
            *writer.batches.lock().unwrap(),
            vec![vec![0, 2], vec![3, 7], vec![8]]
        );
    }
}
