//! `VectorStoreProvider` backed by the embedded `edgevec` vector index.
//!
//! One `edgevec::Index` per named collection, guarded by an `RwLock` since
//! the index itself isn't internally synchronized for mixed read/write
//! access. Payloads (which `edgevec` doesn't store) live alongside each
//! index in a `DashMap` keyed by point id.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::DashMap;
use edgevec::Index;
use serde_json::Value;

use cv_domain::error::{Error, Result};
use cv_domain::ports::{VectorPoint, VectorSearchHit, VectorStoreProvider};

struct Collection {
    index: RwLock<Index>,
    payloads: DashMap<String, HashMap<String, Value>>,
}

/// An embedded, process-local vector store: one file (or in-memory) index
/// per named collection.
pub struct EdgevecStore {
    collections: DashMap<String, Collection>,
}

impl Default for EdgevecStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgevecStore {
    /// Builds a store with no collections yet; [`Self::ensure_collection`]
    /// creates them lazily.
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
        }
    }
}

#[async_trait]
impl VectorStoreProvider for EdgevecStore {
    async fn ensure_collection(&self, collection: &str, dimensions: usize) -> Result<()> {
        if self.collections.contains_key(collection) {
            return Ok(());
        }
        let index = Index::new(dimensions)
            .map_err(|e| Error::store_unavailable(format!("edgevec index init for {collection}: {e}")))?;
        self.collections.insert(
            collection.to_string(),
            Collection {
                index: RwLock::new(index),
                payloads: DashMap::new(),
            },
        );
        Ok(())
    }

    async fn upsert_batch(&self, collection: &str, points: &[VectorPoint]) -> Result<()> {
        let entry = self
            .collections
            .get(collection)
            .ok_or_else(|| Error::store_unavailable(format!("collection {collection} not initialized")))?;

        let mut index = entry.index.write().expect("edgevec index lock poisoned");
        for point in points {
            index
                .upsert(&point.id, &point.vector)
                .map_err(|e| Error::store_unavailable(format!("edgevec upsert into {collection}: {e}")))?;
            entry.payloads.insert(point.id.clone(), point.payload.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
        filter: Option<&str>,
    ) -> Result<Vec<VectorSearchHit>> {
        let Some(entry) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let index = entry.index.read().expect("edgevec index lock poisoned");
        let hits = index
            .search(vector, limit)
            .map_err(|e| Error::store_unavailable(format!("edgevec search in {collection}: {e}")))?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let payload = entry
                .payloads
                .get(&hit.id)
                .map(|p| p.clone())
                .unwrap_or_default();
            if let Some(filter) = filter {
                if !payload_matches(&payload, filter) {
                    continue;
                }
            }
            results.push(VectorSearchHit {
                id: hit.id,
                score: hit.score,
                payload,
            });
        }
        Ok(results)
    }

    async fn delete(&self, collection: &str, filter: &str) -> Result<()> {
        let Some(entry) = self.collections.get(collection) else {
            return Ok(());
        };
        let to_remove: Vec<String> = entry
            .payloads
            .iter()
            .filter(|kv| payload_matches(kv.value(), filter))
            .map(|kv| kv.key().clone())
            .collect();

        let mut index = entry.index.write().expect("edgevec index lock poisoned");
        for id in to_remove {
            let _ = index.remove(&id);
            entry.payloads.remove(&id);
        }
        Ok(())
    }

    async fn delete_by_path(&self, collection: &str, path: &str) -> Result<()> {
        self.delete(collection, &format!("path={path}")).await
    }

    async fn point_count(&self, collection: &str) -> Result<usize> {
        Ok(self
            .collections
            .get(collection)
            .map(|entry| entry.payloads.len())
            .unwrap_or(0))
    }
}

/// Matches this store's only supported filter grammar: `key=value`, an
/// exact string-equality check against one payload field. Sufficient for
/// the Context Engine's and Sync Engine's current call sites; richer
/// filter expressions are unused by any caller today.
fn payload_matches(payload: &HashMap<String, Value>, filter: &str) -> bool {
    let Some((key, value)) = filter.split_once('=') else {
        return false;
    };
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .is_some_and(|v| v == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, path: &str) -> VectorPoint {
        let mut payload = HashMap::new();
        payload.insert("path".to_string(), Value::String(path.to_string()));
        VectorPoint {
            id: id.to_string(),
            vector: vec![1.0, 0.0, 0.0],
            payload,
        }
    }

    #[tokio::test]
    async fn delete_by_path_removes_matching_points_only() {
        let store = EdgevecStore::new();
        store.ensure_collection("code_chunks", 3).await.unwrap();
        store
            .upsert_batch("code_chunks", &[point("a", "src/a.rs"), point("b", "src/b.rs")])
            .await
            .unwrap();

        store.delete_by_path("code_chunks", "src/a.rs").await.unwrap();

        let hits = store
            .search("code_chunks", &[1.0, 0.0, 0.0], 10, None)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
    }

    #[tokio::test]
    async fn search_against_missing_collection_returns_empty() {
        let store = EdgevecStore::new();
        let hits = store.search("nope", &[1.0], 5, None).await.unwrap();
        assert!(hits.is_empty());
    }
}
