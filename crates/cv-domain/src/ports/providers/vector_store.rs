//! Vector store contract: named collections, upserts, k-NN search.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;

/// A single point to upsert: an id, its embedding, and its payload.
#[derive(Debug, Clone)]
pub struct VectorPoint {
 /// Matches the owning [`crate::value_objects::Chunk`]'s `id`.
 pub id: String,
 /// Embedding vector, dimensionality fixed per collection.
 pub vector: Vec<f32>,
 /// Payload: `{path, startLine, endLine, symbolName?, symbolKind?, language, docstring?, text}`.
 pub payload: HashMap<String, Value>,
}

/// A single k-NN search hit.
#[derive(Debug, Clone)]
pub struct VectorSearchHit {
 /// Id of the matched point.
 pub id: String,
 /// Similarity score, collection-specific scale.
 pub score: f32,
 /// The point's stored payload.
 pub payload: HashMap<String, Value>,
}

/// Named-collection vector store contract.
///
/// The core assumes the store can embed text internally when given it
/// directly; concrete adapters that can't are expected to embed via
/// [`super::EmbeddingProvider`] themselves and upsert/search by vector.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
 /// Ensures `collection` exists with the given vector dimensionality.
 async fn ensure_collection(&self, collection: &str, dimensions: usize) -> Result<()>;

 /// Upserts a batch of points into `collection`.
 async fn upsert_batch(&self, collection: &str, points: &[VectorPoint]) -> Result<()>;

 /// Finds the `limit` nearest neighbors of `vector` in `collection`,
 /// optionally restricted by a store-specific filter expression.
 async fn search(
 &self,
 collection: &str,
 vector: &[f32],
 limit: usize,
 filter: Option<&str>,
 ) -> Result<Vec<VectorSearchHit>>;

 /// Deletes every point in `collection` matching `filter`.
 async fn delete(&self, collection: &str, filter: &str) -> Result<()>;

 /// Deletes every point in `collection` whose `path` payload field equals `path`.
 async fn delete_by_path(&self, collection: &str, path: &str) -> Result<()>;

 /// Total point count currently held by `collection`, for
 /// `SyncState.vectorCount`. Returns `0` for a collection that was never
 /// created via [`Self::ensure_collection`].
 async fn point_count(&self, collection: &str) -> Result<usize>;
}
