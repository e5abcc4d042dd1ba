//! Similarity backend capability and the dense provider seam.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::embedder::Embedder;
use super::vector_store::{DistanceMetric, VectorStore};
use crate::error::SkillmeshResult;

/// Dense similarity capability consumed by the ranker.
#[async_trait]
pub trait SimilarityBackend: Send + Sync {
    /// Whether this backend produces dense similarities at all.
    fn supports_dense(&self) -> bool;

    /// Similarities in `[0, 1]` for the candidates this backend can score.
    ///
    /// Ids missing from the returned map have no dense contribution.
    async fn query(
        &self,
        query_text: &str,
        candidate_ids: &[String],
        top_k: usize,
    ) -> SkillmeshResult<HashMap<String, f32>>;

    /// Short backend name for logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// A connected embedder and vector store pair.
#[derive(Clone)]
pub struct DenseComponents {
    /// Embeds card descriptions and queries.
    pub embedder: Arc<dyn Embedder>,
    /// Stores card vectors in a named collection.
    pub store: Arc<dyn VectorStore>,
    /// Metric used when the collection has to be created.
    pub distance: DistanceMetric,
}

impl DenseComponents {
    /// Pair an embedder with a store, using cosine distance.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            distance: DistanceMetric::Cosine,
        }
    }

    /// Override the collection distance metric.
    pub fn with_distance(mut self, distance: DistanceMetric) -> Self {
        self.distance = distance;
        self
    }
}

impl std::fmt::Debug for DenseComponents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseComponents")
            .field("model", &self.embedder.model_name())
            .field("collection", &self.store.collection_name())
            .field("distance", &self.distance)
            .finish()
    }
}

/// Source of dense components, invoked once while a retriever is being built.
#[async_trait]
pub trait DenseProvider: Send + Sync {
    /// Construct (and connect) the embedder and vector store.
    async fn connect(&self) -> SkillmeshResult<DenseComponents>;
}

#[async_trait]
impl DenseProvider for DenseComponents {
    async fn connect(&self) -> SkillmeshResult<DenseComponents> {
        Ok(self.clone())
    }
}
