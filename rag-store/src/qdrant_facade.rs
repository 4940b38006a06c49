//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind a minimal API,
//! hiding away the verbose builder pattern and keeping the rest of the
//! application decoupled from `qdrant-client`.

use std::collections::HashMap;

use crate::config::{DistanceKind, RagConfig, VectorSpace};
use crate::errors::RagError;
use crate::record::IndexedDocument;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointId, PointStruct, SearchParamsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QValue, Vectors, VectorParamsBuilder,
    value,
};
use tracing::{debug, info, instrument};

/// A facade over the Qdrant client to keep the rest of the code clean and stable.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    distance: DistanceKind,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Uses the builder-based API of `qdrant-client` and supports optional
    /// API key authentication. No network call happens here.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
        })
    }

    /// Ensures that the collection exists in Qdrant.
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it with the given vector space configuration.
    pub async fn ensure_collection(&self, space: &VectorSpace) -> Result<(), RagError> {
        info!(
            "Ensuring collection '{}' with size={} distance={:?}",
            self.collection, space.size, space.distance
        );

        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;
        if exists {
            debug!("Collection '{}' already exists", self.collection);
            return Ok(());
        }

        let distance = match space.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(space.size as u64, distance)),
            )
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        info!("Collection '{}' created successfully", self.collection);
        Ok(())
    }

    /// Upserts (inserts or overwrites by id) a batch of points and waits for the write.
    ///
    /// Returns the number of points sent.
    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<usize, RagError> {
        if points.is_empty() {
            debug!("No points provided for upsert");
            return Ok(0);
        }

        let count = points.len();
        info!("Upserting {} points into collection '{}'", count, self.collection);

        let res = self
            .client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        debug!("Upsert operation result={:?}", res.result);
        Ok(count)
    }

    /// Performs a similarity search.
    ///
    /// Returns `(score, payload)` tuples in Qdrant's ranking order.
    #[instrument(skip_all, fields(collection = %self.collection, top_k = top_k, exact = exact))]
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        exact: bool,
    ) -> Result<Vec<(f32, serde_json::Value)>, RagError> {
        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let out: Vec<_> = res
            .result
            .into_iter()
            .map(|r| (r.score, qpayload_to_json(r.payload)))
            .collect();

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }

    /// Distance function configured for this collection.
    pub fn distance(&self) -> DistanceKind {
        self.distance
    }
}

/// Builds a Qdrant point for a document: id = line number, payload = `{text, question}`.
pub fn document_point(doc: &IndexedDocument, vector: Vec<f32>) -> PointStruct {
    let mut payload: HashMap<String, QValue> = HashMap::new();
    payload.insert("text".into(), qstring(&doc.text));
    payload.insert("question".into(), qstring(&doc.question));

    PointStruct {
        id: Some(PointId::from(doc.id)),
        payload,
        vectors: Some(Vectors::from(vector)),
        ..Default::default()
    }
}

/// Wraps a string into Qdrant `Value`.
fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(value::Kind::StringValue(s.to_string())),
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
///
/// Nested objects/arrays are mapped to `Null`; FAQ payloads are flat.
fn qpayload_to_json(mut p: HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}
