//! In-process vector store with brute-force search.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use skillmesh_core::error::{ErrorCode, SkillmeshError, SkillmeshResult};
use skillmesh_core::traits::{
    CollectionInfo, DistanceMetric, VectorRecord, VectorSearchResult, VectorStore,
    VectorStoreConfig,
};

#[derive(Debug)]
struct Collection {
    dimension: usize,
    distance: DistanceMetric,
    records: HashMap<String, VectorRecord>,
}

/// Vector store held entirely in memory.
///
/// Data lives as long as the store; nothing is persisted.
#[derive(Debug)]
pub struct MemoryVectorStore {
    collection_name: String,
    collections: RwLock<HashMap<String, Collection>>,
}

fn poisoned() -> SkillmeshError {
    SkillmeshError::vector_store("Memory vector store lock poisoned")
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

fn score(metric: DistanceMetric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        DistanceMetric::Cosine => cosine(a, b),
        DistanceMetric::DotProduct => a.iter().zip(b).map(|(x, y)| x * y).sum(),
        DistanceMetric::Euclidean => {
            let dist = a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt();
            1.0 / (1.0 + dist)
        }
    }
}

impl MemoryVectorStore {
    /// Create a store bound to `collection_name`.
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store from configuration.
    pub fn from_config(config: &VectorStoreConfig) -> Self {
        Self::new(config.collection_name.clone())
    }

    fn not_found(&self) -> SkillmeshError {
        SkillmeshError::VectorStore {
            message: format!("Collection '{}' not found", self.collection_name),
            code: ErrorCode::VecCollectionNotFound,
            source: None,
        }
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        distance: DistanceMetric,
    ) -> SkillmeshResult<()> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        collections.entry(name.to_string()).or_insert_with(|| Collection {
            dimension,
            distance,
            records: HashMap::new(),
        });
        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> SkillmeshResult<()> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let collection = collections
            .get_mut(&self.collection_name)
            .ok_or_else(|| self.not_found())?;

        if let Some(bad) = records.iter().find(|r| r.vector.len() != collection.dimension) {
            return Err(SkillmeshError::vector_store(format!(
                "Vector for '{}' has dimension {}, expected {}",
                bad.id,
                bad.vector.len(),
                collection.dimension
            )));
        }
        for record in records {
            collection.records.insert(record.id.clone(), record);
        }
        Ok(())
    }

    async fn search(
        &self,
        query_vector: &[f32],
        limit: usize,
        ids: Option<&[String]>,
    ) -> SkillmeshResult<Vec<VectorSearchResult>> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        let collection = collections
            .get(&self.collection_name)
            .ok_or_else(|| self.not_found())?;

        let allowed: Option<HashSet<&str>> =
            ids.map(|ids| ids.iter().map(String::as_str).collect());
        let mut results: Vec<VectorSearchResult> = collection
            .records
            .values()
            .filter(|record| {
                allowed
                    .as_ref()
                    .map_or(true, |allowed| allowed.contains(record.id.as_str()))
            })
            .map(|record| VectorSearchResult {
                id: record.id.clone(),
                score: score(collection.distance, query_vector, &record.vector),
                payload: record.payload.clone(),
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        results.truncate(limit);
        Ok(results)
    }

    async fn delete_collection(&self, name: &str) -> SkillmeshResult<()> {
        self.collections
            .write()
            .map_err(|_| poisoned())?
            .remove(name);
        Ok(())
    }

    async fn collection_info(&self, name: &str) -> SkillmeshResult<CollectionInfo> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        let collection = collections.get(name).ok_or_else(|| self.not_found())?;
        Ok(CollectionInfo {
            name: name.to_string(),
            vector_count: collection.records.len() as u64,
            distance: collection.distance,
        })
    }

    fn collection_name(&self) -> &str {
        &self.collection_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, vector: Vec<f32>) -> VectorRecord {
        VectorRecord::new(id, vector, HashMap::new())
    }

    async fn store() -> MemoryVectorStore {
        let store = MemoryVectorStore::new("cards");
        store
            .create_collection("cards", 2, DistanceMetric::Cosine)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = store().await;
        store.upsert(vec![record("a", vec![1.0, 0.0])]).await.unwrap();
        store.upsert(vec![record("a", vec![0.0, 1.0])]).await.unwrap();

        let info = store.collection_info("cards").await.unwrap();
        assert_eq!(info.vector_count, 1);
        let hits = store.search(&[0.0, 1.0], 1, None).await.unwrap();
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_search_orders_and_limits() {
        let store = store().await;
        store
            .upsert(vec![
                record("far", vec![0.0, 1.0]),
                record("near", vec![1.0, 0.1]),
                record("exact", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 2, None).await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "near"]);
    }

    #[tokio::test]
    async fn test_search_restricted_to_ids() {
        let store = store().await;
        store
            .upsert(vec![
                record("stale", vec![1.0, 0.0]),
                record("card", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let allowed = vec!["card".to_string()];
        let hits = store.search(&[1.0, 0.0], 1, Some(allowed.as_slice())).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "card");

        assert!(store.search(&[1.0, 0.0], 5, Some(&[][..])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let store = store().await;
        assert!(store.upsert(vec![record("a", vec![1.0])]).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_collection() {
        let store = MemoryVectorStore::new("cards");
        assert!(store.search(&[1.0], 3, None).await.is_err());
        store.create_collection("cards", 1, DistanceMetric::Cosine).await.unwrap();
        store.delete_collection("cards").await.unwrap();
        assert!(store.collection_info("cards").await.is_err());
    }

    #[test]
    fn test_euclidean_score() {
        let s = score(DistanceMetric::Euclidean, &[0.0, 0.0], &[3.0, 4.0]);
        assert!((s - 1.0 / 6.0).abs() < 1e-6);
    }
}
