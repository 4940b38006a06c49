//! Runtime and collection configuration.

use std::str::FromStr;

use ai_llm_service::error_handler::{env_opt, env_or, env_parse_opt, env_parse_or};

use crate::errors::RagError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl DistanceKind {
    /// Converts a Qdrant score into a distance where lower means more similar.
    ///
    /// Cosine/Dot scores are similarities (`1.0` = identical), so the distance
    /// is `1 - score`, which lands in `[0, 2]` for cosine. Euclid scores are
    /// already distances.
    pub fn score_to_distance(self, score: f32) -> f32 {
        match self {
            DistanceKind::Cosine | DistanceKind::Dot => 1.0 - score,
            DistanceKind::Euclid => score,
        }
    }
}

impl FromStr for DistanceKind {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(DistanceKind::Cosine),
            "dot" => Ok(DistanceKind::Dot),
            "euclid" | "euclidean" => Ok(DistanceKind::Euclid),
            other => Err(RagError::Config(format!("unsupported distance: {other}"))),
        }
    }
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for FAQ ingestion and retrieval.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Upsert batch size (typical range: 128..512).
    pub upsert_batch: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Expected embedding dimension; taken from the first vector when `None`.
    pub embedding_dim: Option<usize>,
    /// Parallel embedding requests during ingestion.
    pub embedding_concurrency: usize,
}

impl RagConfig {
    /// Creates a sane default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 256,
            exact_search: false,
            embedding_dim: None,
            embedding_concurrency: 4,
        }
    }

    /// Reads the config from environment variables.
    ///
    /// `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`, `QDRANT_DISTANCE`,
    /// `QDRANT_BATCH_SIZE`, `RAG_EXACT_SEARCH`, `EMBEDDING_DIM`, `EMBEDDING_CONCURRENCY`.
    ///
    /// # Errors
    /// Returns `RagError::Config` for unparsable or invalid values.
    pub fn from_env() -> Result<Self, RagError> {
        let mut cfg = Self::new_default(
            env_or("QDRANT_URL", "http://localhost:6334"),
            env_or("QDRANT_COLLECTION", "faq"),
        );
        cfg.qdrant_api_key = env_opt("QDRANT_API_KEY");
        cfg.distance = env_or("QDRANT_DISTANCE", "cosine").parse()?;
        cfg.upsert_batch = env_parse_or("QDRANT_BATCH_SIZE", 256, "expected usize")?;
        cfg.exact_search = env_parse_or("RAG_EXACT_SEARCH", false, "expected true/false")?;
        cfg.embedding_dim = env_parse_opt("EMBEDDING_DIM", "expected usize")?;
        cfg.embedding_concurrency = env_parse_or("EMBEDDING_CONCURRENCY", 4, "expected usize")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(RagError::Config("upsert_batch must be > 0".into()));
        }
        if self.embedding_dim == Some(0) {
            return Err(RagError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_scores_become_distances() {
        let d = DistanceKind::Cosine;
        assert_eq!(d.score_to_distance(1.0), 0.0);
        assert!((d.score_to_distance(0.6) - 0.4).abs() < 1e-6);
        assert_eq!(d.score_to_distance(-1.0), 2.0);
        assert_eq!(DistanceKind::Euclid.score_to_distance(0.3), 0.3);
    }

    #[test]
    fn parses_distance_names() {
        assert_eq!("Cosine".parse::<DistanceKind>().unwrap(), DistanceKind::Cosine);
        assert_eq!("euclidean".parse::<DistanceKind>().unwrap(), DistanceKind::Euclid);
        assert!("manhattan".parse::<DistanceKind>().is_err());
    }

    #[test]
    fn validate_rejects_empty_collection() {
        let cfg = RagConfig::new_default("http://localhost:6334", " ");
        assert!(cfg.validate().is_err());
    }
}
