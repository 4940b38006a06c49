//! Nearest-neighbour retrieval of the single best FAQ document.

use futures::future::BoxFuture;
use tracing::trace;

use crate::config::DistanceKind;
use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::TopMatch;

/// Top-1 lookup against the embedding index.
///
/// Implementations never apply a relevance threshold; callers decide what
/// distance is close enough. Failures are returned, not swallowed.
pub trait VectorRetriever: Send + Sync {
    fn query_top_match<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, Result<Option<TopMatch>, RagError>>;
}

/// Embeds `text` and returns the closest document, if any.
///
/// # Errors
/// Returns embedding/provider errors or Qdrant failures.
pub async fn top_match(
    client: &QdrantFacade,
    provider: &dyn EmbeddingsProvider,
    text: &str,
    exact: bool,
) -> Result<Option<TopMatch>, RagError> {
    let qv = provider.embed(text).await?;
    let hits = client.search(qv, 1, exact).await?;
    trace!("retrieve::top_match hits={}", hits.len());

    Ok(hits
        .into_iter()
        .next()
        .and_then(|(score, payload)| hit_to_match(client.distance(), score, &payload)))
}

/// Maps a scored payload to a [`TopMatch`]; hits without document text are dropped.
pub(crate) fn hit_to_match(
    distance: DistanceKind,
    score: f32,
    payload: &serde_json::Value,
) -> Option<TopMatch> {
    let document = payload
        .get("text")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())?
        .to_string();
    let question = payload
        .get("question")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    Some(TopMatch {
        document,
        question,
        distance: distance.score_to_distance(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_payload_and_converts_score() {
        let m = hit_to_match(
            DistanceKind::Cosine,
            0.75,
            &json!({"text": "We are open 9-5.", "question": "What are your hours?"}),
        )
        .unwrap();
        assert_eq!(m.document, "We are open 9-5.");
        assert_eq!(m.question, "What are your hours?");
        assert!((m.distance - 0.25).abs() < 1e-6);
    }

    #[test]
    fn empty_or_missing_text_is_no_match() {
        assert!(hit_to_match(DistanceKind::Cosine, 0.9, &json!({"text": ""})).is_none());
        assert!(hit_to_match(DistanceKind::Cosine, 0.9, &json!({"question": "q"})).is_none());
    }
}
