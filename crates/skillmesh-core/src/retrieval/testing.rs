//! In-process fakes for the dense path.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{SkillmeshError, SkillmeshResult};
use crate::traits::{
    CollectionInfo, DenseComponents, DenseProvider, DistanceMetric, Embedder, EmbeddingAction,
    VectorRecord, VectorSearchResult, VectorStore,
};

const AXES: [&str; 3] = ["image", "text", "data"];

/// Embeds text as keyword presence over a fixed vocabulary.
#[derive(Default)]
pub(crate) struct KeywordEmbedder {
    pub calls: AtomicUsize,
    /// When set, query-time embedding fails.
    pub fail_search: AtomicBool,
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(
        &self,
        text: &str,
        action: Option<EmbeddingAction>,
    ) -> SkillmeshResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if action == Some(EmbeddingAction::Search) && self.fail_search.load(Ordering::SeqCst) {
            return Err(SkillmeshError::embedding("embedding service timed out"));
        }
        let lower = text.to_lowercase();
        Ok(AXES
            .iter()
            .map(|axis| if lower.contains(axis) { 1.0 } else { 0.0 })
            .collect())
    }

    fn dimension(&self) -> usize {
        AXES.len()
    }

    fn model_name(&self) -> &str {
        "keyword"
    }
}

/// Brute-force cosine store.
#[derive(Default)]
pub(crate) struct ListStore {
    pub records: Mutex<Vec<VectorRecord>>,
    /// When set, search fails.
    pub fail_search: AtomicBool,
}

impl ListStore {
    /// Store records without going through `upsert`.
    pub fn seed(&self, records: Vec<VectorRecord>) {
        self.records.lock().unwrap().extend(records);
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[async_trait]
impl VectorStore for ListStore {
    async fn create_collection(&self, _: &str, _: usize, _: DistanceMetric) -> SkillmeshResult<()> {
        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> SkillmeshResult<()> {
        let mut stored = self.records.lock().unwrap();
        for record in records {
            stored.retain(|r| r.id != record.id);
            stored.push(record);
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &[f32],
        limit: usize,
        ids: Option<&[String]>,
    ) -> SkillmeshResult<Vec<VectorSearchResult>> {
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(SkillmeshError::vector_store("search failed: connection reset"));
        }
        let stored = self.records.lock().unwrap();
        let mut results: Vec<VectorSearchResult> = stored
            .iter()
            .filter(|r| ids.map_or(true, |ids| ids.contains(&r.id)))
            .map(|r| VectorSearchResult {
                id: r.id.clone(),
                score: cosine(query, &r.vector),
                payload: r.payload.clone(),
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);
        Ok(results)
    }

    async fn delete_collection(&self, _: &str) -> SkillmeshResult<()> {
        self.records.lock().unwrap().clear();
        Ok(())
    }

    async fn collection_info(&self, name: &str) -> SkillmeshResult<CollectionInfo> {
        Ok(CollectionInfo {
            name: name.to_string(),
            vector_count: self.records.lock().unwrap().len() as u64,
            distance: DistanceMetric::Cosine,
        })
    }

    fn collection_name(&self) -> &str {
        "test_cards"
    }
}

pub(crate) fn components() -> (Arc<KeywordEmbedder>, Arc<ListStore>, DenseComponents) {
    let embedder = Arc::new(KeywordEmbedder::default());
    let store = Arc::new(ListStore::default());
    let components = DenseComponents::new(embedder.clone(), store.clone());
    (embedder, store, components)
}

/// Provider whose connection always fails.
pub(crate) struct UnreachableProvider;

#[async_trait]
impl DenseProvider for UnreachableProvider {
    async fn connect(&self) -> SkillmeshResult<DenseComponents> {
        Err(SkillmeshError::vector_store_connection(
            "connection refused: http://localhost:8000",
        ))
    }
}
