//! Embedding executor with concurrency and dimension checks.

use crate::{embed::EmbeddingsProvider, errors::RagError, record::IndexedDocument};
use futures::{
    future::BoxFuture,
    stream::{self, StreamExt},
};
use tracing::{debug, info};

/// Embeds every document's text, preserving input order.
///
/// # Arguments
/// - `docs`: documents to embed.
/// - `provider`: embedding backend.
/// - `expected_dim`: if `Some`, enforces this vector size; otherwise the first
///   vector fixes the size for the rest.
/// - `concurrency`: maximum number of concurrent embedding requests.
///
/// # Errors
/// Returns [`RagError::VectorSizeMismatch`] if dimensions disagree,
/// or the provider's error if any request fails.
pub async fn embed_documents(
    docs: &[IndexedDocument],
    provider: &dyn EmbeddingsProvider,
    expected_dim: Option<usize>,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>, RagError> {
    info!(
        "embed_pool::embed_documents: total={} concurrency={}",
        docs.len(),
        concurrency
    );

    let jobs: Vec<BoxFuture<'_, Result<(usize, Vec<f32>), RagError>>> = docs
        .iter()
        .enumerate()
        .map(|(i, doc)| -> BoxFuture<'_, Result<(usize, Vec<f32>), RagError>> {
            Box::pin(async move {
                let v = provider.embed(&doc.text).await?;
                Ok::<(usize, Vec<f32>), RagError>((i, v))
            })
        })
        .collect();

    let mut results: Vec<(usize, Vec<f32>)> = stream::iter(jobs)
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, RagError>>()?;

    results.sort_by_key(|(i, _)| *i);

    let mut want = expected_dim;
    let mut out = Vec::with_capacity(results.len());
    for (_, v) in results {
        let dim = *want.get_or_insert(v.len());
        if v.len() != dim {
            return Err(RagError::VectorSizeMismatch { got: v.len(), want: dim });
        }
        out.push(v);
    }

    debug!("embed_pool::embed_documents: {} vectors ready", out.len());
    Ok(out)
}
