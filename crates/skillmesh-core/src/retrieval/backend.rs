//! Similarity backends: lexical-only memory backend and the vector backend.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{SkillmeshError, SkillmeshResult};
use crate::traits::{
    DenseComponents, Embedder, EmbeddingAction, SimilarityBackend, VectorRecord, VectorStore,
};
use crate::types::CardCorpus;

/// Backend with no dense capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBackend;

#[async_trait]
impl SimilarityBackend for MemoryBackend {
    fn supports_dense(&self) -> bool {
        false
    }

    async fn query(
        &self,
        _query_text: &str,
        _candidate_ids: &[String],
        _top_k: usize,
    ) -> SkillmeshResult<HashMap<String, f32>> {
        Ok(HashMap::new())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Dense backend over an embedder and an external vector store.
///
/// Owns its store handle; dropping the backend releases the connection.
pub struct VectorBackend {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl std::fmt::Debug for VectorBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorBackend")
            .field("model", &self.embedder.model_name())
            .field("collection", &self.store.collection_name())
            .finish()
    }
}

impl VectorBackend {
    /// Index the corpus into the store and return a ready backend.
    pub async fn connect(
        corpus: &CardCorpus,
        components: DenseComponents,
    ) -> SkillmeshResult<Self> {
        let indexed = index_corpus(corpus, &components).await?;
        info!(
            collection = components.store.collection_name(),
            model = components.embedder.model_name(),
            cards = indexed,
            "Vector backend ready"
        );
        Ok(Self {
            embedder: components.embedder,
            store: components.store,
        })
    }
}

#[async_trait]
impl SimilarityBackend for VectorBackend {
    fn supports_dense(&self) -> bool {
        true
    }

    async fn query(
        &self,
        query_text: &str,
        candidate_ids: &[String],
        top_k: usize,
    ) -> SkillmeshResult<HashMap<String, f32>> {
        if candidate_ids.is_empty() || query_text.trim().is_empty() {
            return Ok(HashMap::new());
        }

        let vector = self
            .embedder
            .embed(query_text, Some(EmbeddingAction::Search))
            .await?;
        // Restrict to the corpus so records left by other registries in a
        // shared collection cannot take up the limit.
        let limit = candidate_ids.len().max(top_k);
        let results = self
            .store
            .search(&vector, limit, Some(candidate_ids))
            .await?;

        let allowed: HashSet<&str> = candidate_ids.iter().map(String::as_str).collect();
        let mut similarities: HashMap<String, f32> = HashMap::new();
        for result in results {
            if !allowed.contains(result.id.as_str()) || !result.score.is_finite() {
                continue;
            }
            let score = result.score.clamp(0.0, 1.0);
            similarities
                .entry(result.id)
                .and_modify(|s| *s = s.max(score))
                .or_insert(score);
        }

        debug!(
            candidates = candidate_ids.len(),
            scored = similarities.len(),
            "Dense similarities fetched"
        );
        Ok(similarities)
    }

    fn name(&self) -> &'static str {
        "vector"
    }
}

/// Embed every card description and upsert it into the components' collection.
///
/// Creates the collection if needed. Returns the number of cards written.
pub async fn index_corpus(
    corpus: &CardCorpus,
    components: &DenseComponents,
) -> SkillmeshResult<usize> {
    let DenseComponents {
        embedder,
        store,
        distance,
    } = components;

    store
        .create_collection(store.collection_name(), embedder.dimension(), *distance)
        .await?;

    if corpus.is_empty() {
        return Ok(0);
    }

    let texts: Vec<String> = corpus
        .iter()
        .map(|card| card.embedding_text().to_string())
        .collect();
    let vectors = embedder
        .embed_batch(&texts, Some(EmbeddingAction::Index))
        .await?;
    if vectors.len() != texts.len() {
        return Err(SkillmeshError::embedding(format!(
            "Embedder returned {} vectors for {} cards",
            vectors.len(),
            texts.len()
        )));
    }

    let records: Vec<VectorRecord> = corpus
        .iter()
        .zip(vectors)
        .map(|(card, vector)| {
            let payload = HashMap::from([
                ("id".to_string(), serde_json::Value::from(card.id.as_str())),
                ("title".to_string(), serde_json::Value::from(card.title.as_str())),
                ("domain".to_string(), serde_json::Value::from(card.domain.as_str())),
            ]);
            VectorRecord::new(card.id.clone(), vector, payload)
        })
        .collect();

    let count = records.len();
    store.upsert(records).await?;
    debug!(collection = store.collection_name(), count, "Upserted card vectors");
    Ok(count)
}

/// The backend resolved for a retriever, chosen once at construction.
#[derive(Debug)]
pub enum SimilarityBackendKind {
    Memory(MemoryBackend),
    Vector(VectorBackend),
}

impl SimilarityBackendKind {
    fn inner(&self) -> &dyn SimilarityBackend {
        match self {
            Self::Memory(backend) => backend,
            Self::Vector(backend) => backend,
        }
    }
}

#[async_trait]
impl SimilarityBackend for SimilarityBackendKind {
    fn supports_dense(&self) -> bool {
        self.inner().supports_dense()
    }

    async fn query(
        &self,
        query_text: &str,
        candidate_ids: &[String],
        top_k: usize,
    ) -> SkillmeshResult<HashMap<String, f32>> {
        self.inner().query(query_text, candidate_ids, top_k).await
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}
