//! Vector store trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::SkillmeshResult;

/// Distance metric for vector similarity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Euclidean,
    DotProduct,
}

/// A vector record with payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique identifier (the card id).
    pub id: String,
    /// Vector embedding.
    pub vector: Vec<f32>,
    /// Metadata payload.
    pub payload: HashMap<String, serde_json::Value>,
}

impl VectorRecord {
    /// Create a new vector record.
    pub fn new(
        id: impl Into<String>,
        vector: Vec<f32>,
        payload: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            vector,
            payload,
        }
    }
}

/// Search result from vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSearchResult {
    /// Unique identifier.
    pub id: String,
    /// Similarity score (higher = closer).
    pub score: f32,
    /// Metadata payload.
    pub payload: HashMap<String, serde_json::Value>,
}

/// Collection information.
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    /// Collection name.
    pub name: String,
    /// Number of vectors.
    pub vector_count: u64,
    /// Distance metric.
    pub distance: DistanceMetric,
}

/// Core VectorStore trait - all vector store backends implement this.
///
/// A store instance is bound to a single collection.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if it does not exist yet.
    async fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        distance: DistanceMetric,
    ) -> SkillmeshResult<()>;

    /// Insert or replace vectors by id.
    async fn upsert(&self, records: Vec<VectorRecord>) -> SkillmeshResult<()>;

    /// Search for the `limit` nearest vectors.
    ///
    /// With `ids`, only records whose id is in the list are considered;
    /// an empty list matches nothing.
    async fn search(
        &self,
        query_vector: &[f32],
        limit: usize,
        ids: Option<&[String]>,
    ) -> SkillmeshResult<Vec<VectorSearchResult>>;

    /// Delete a collection.
    async fn delete_collection(&self, name: &str) -> SkillmeshResult<()>;

    /// Get collection information.
    async fn collection_info(&self, name: &str) -> SkillmeshResult<CollectionInfo>;

    /// Get the collection name.
    fn collection_name(&self) -> &str;
}

/// Vector store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: VectorStoreProvider,
    /// Collection name.
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
    /// Server URL for remote providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Tenant (Chroma).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Database (Chroma).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Distance metric for new collections.
    #[serde(default)]
    pub distance: DistanceMetric,
}

fn default_collection_name() -> String {
    "skillmesh_experts".to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            provider: VectorStoreProvider::Chroma,
            collection_name: default_collection_name(),
            url: None,
            tenant: None,
            database: None,
            distance: DistanceMetric::Cosine,
        }
    }
}

/// Vector store provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreProvider {
    #[default]
    Chroma,
    /// In-process brute-force store.
    Memory,
}
