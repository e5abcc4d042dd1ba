//! Chroma vector store implementation.
//!
//! Talks to a Chroma server over its v2 REST API. Vectors are computed by the
//! caller's embedder; Chroma only stores and searches them.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use skillmesh_core::error::{ErrorCode, SkillmeshError, SkillmeshResult};
use skillmesh_core::traits::{
    CollectionInfo, DistanceMetric, VectorRecord, VectorSearchResult, VectorStore,
    VectorStoreConfig,
};

use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const DEFAULT_CHROMA_URL: &str = "http://localhost:8000";

/// Chroma vector store bound to one collection.
pub struct ChromaVectorStore {
    client: Client,
    base_url: String,
    tenant: String,
    database: String,
    config: VectorStoreConfig,
    collection_id: Mutex<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct ChromaCollection {
    id: String,
}

impl ChromaVectorStore {
    /// Create a store and check that the server answers.
    pub async fn new(config: VectorStoreConfig) -> SkillmeshResult<Self> {
        let base_url = config
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_CHROMA_URL.to_string());
        url::Url::parse(&base_url)
            .map_err(|e| SkillmeshError::configuration(format!("Invalid Chroma URL: {}", e)))?;

        let tenant = config
            .tenant
            .clone()
            .unwrap_or_else(|| "default_tenant".to_string());

        let database = config
            .database
            .clone()
            .unwrap_or_else(|| "default_database".to_string());

        let store = Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            tenant,
            database,
            config,
            collection_id: Mutex::new(None),
        };
        store.heartbeat().await?;
        Ok(store)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v2{}", self.base_url, path)
    }

    fn collections_url(&self) -> String {
        self.api_url(&format!(
            "/tenants/{}/databases/{}/collections",
            self.tenant, self.database
        ))
    }

    fn distance_to_chroma(metric: DistanceMetric) -> &'static str {
        match metric {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "l2",
            DistanceMetric::DotProduct => "ip",
        }
    }

    /// Convert a Chroma distance into a higher-is-closer score.
    fn distance_to_score(&self, distance: f32) -> f32 {
        match self.config.distance {
            DistanceMetric::Cosine | DistanceMetric::DotProduct => 1.0 - distance,
            DistanceMetric::Euclidean => 1.0 / (1.0 + distance.max(0.0)),
        }
    }

    async fn heartbeat(&self) -> SkillmeshResult<()> {
        let url = self.api_url("/heartbeat");
        let response = self.client.get(&url).send().await.map_err(|e| SkillmeshError::VectorStore {
            message: format!("Chroma not reachable at {}: {}", self.base_url, e),
            code: ErrorCode::VecConnectionFailed,
            source: Some(Box::new(e)),
        })?;
        if !response.status().is_success() {
            return Err(SkillmeshError::vector_store_connection(format!(
                "Chroma heartbeat failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn check(response: Response, action: &str) -> SkillmeshResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error = response.text().await.unwrap_or_default();
        Err(SkillmeshError::vector_store(format!(
            "Failed to {} ({}): {}",
            action, status, error
        )))
    }

    async fn post(&self, url: &str, body: &Value, action: &str) -> SkillmeshResult<Response> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| SkillmeshError::vector_store(format!("Failed to {}: {}", action, e)))?;
        Self::check(response, action).await
    }

    async fn get_or_create_collection(
        &self,
        name: &str,
        metric: DistanceMetric,
    ) -> SkillmeshResult<String> {
        let body = json!({
            "name": name,
            "get_or_create": true,
            "metadata": {
                "hnsw:space": Self::distance_to_chroma(metric)
            }
        });

        let response = self
            .post(&self.collections_url(), &body, "create collection")
            .await?;
        let collection: ChromaCollection = response.json().await.map_err(|e| {
            SkillmeshError::vector_store(format!("Failed to parse response: {}", e))
        })?;
        Ok(collection.id)
    }

    async fn lookup_collection_id(&self, name: &str) -> SkillmeshResult<Option<String>> {
        let url = format!("{}/{}", self.collections_url(), name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SkillmeshError::vector_store(format!("Failed to get collection: {}", e)))?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let response = Self::check(response, "get collection").await?;
        let collection: ChromaCollection = response.json().await.map_err(|e| {
            SkillmeshError::vector_store(format!("Failed to parse response: {}", e))
        })?;
        Ok(Some(collection.id))
    }

    fn cached_id(&self) -> Option<String> {
        self.collection_id.lock().ok().and_then(|id| id.clone())
    }

    fn cache_id(&self, id: Option<String>) {
        if let Ok(mut cached) = self.collection_id.lock() {
            *cached = id;
        }
    }

    /// Id of the bound collection, looked up once.
    async fn collection_id(&self) -> SkillmeshResult<String> {
        if let Some(id) = self.cached_id() {
            return Ok(id);
        }
        let id = self
            .lookup_collection_id(&self.config.collection_name)
            .await?
            .ok_or_else(|| SkillmeshError::VectorStore {
                message: format!("Collection '{}' not found", self.config.collection_name),
                code: ErrorCode::VecCollectionNotFound,
                source: None,
            })?;
        self.cache_id(Some(id.clone()));
        Ok(id)
    }

    /// Metadata filter matching records whose payload `id` is in `ids`.
    fn id_filter(ids: &[String]) -> Value {
        json!({ "id": { "$in": ids } })
    }

    fn collection_url(&self, collection_id: &str, action: &str) -> String {
        format!("{}/{}/{}", self.collections_url(), collection_id, action)
    }
}

#[async_trait]
impl VectorStore for ChromaVectorStore {
    async fn create_collection(
        &self,
        name: &str,
        _dimension: usize,
        distance: DistanceMetric,
    ) -> SkillmeshResult<()> {
        let id = self.get_or_create_collection(name, distance).await?;
        if name == self.config.collection_name {
            self.cache_id(Some(id));
        }
        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> SkillmeshResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let collection_id = self.collection_id().await?;
        let count = records.len();
        let mut ids = Vec::with_capacity(count);
        let mut embeddings = Vec::with_capacity(count);
        let mut metadatas = Vec::with_capacity(count);
        for record in records {
            ids.push(record.id);
            embeddings.push(record.vector);
            metadatas.push(record.payload);
        }

        let body = json!({
            "ids": ids,
            "embeddings": embeddings,
            "metadatas": metadatas
        });
        self.post(&self.collection_url(&collection_id, "upsert"), &body, "upsert")
            .await?;
        debug!(collection = %self.config.collection_name, count, "Upserted into Chroma");
        Ok(())
    }

    async fn search(
        &self,
        query_vector: &[f32],
        limit: usize,
        ids: Option<&[String]>,
    ) -> SkillmeshResult<Vec<VectorSearchResult>> {
        if limit == 0 || ids.is_some_and(|ids| ids.is_empty()) {
            return Ok(Vec::new());
        }
        let collection_id = self.collection_id().await?;

        let mut body = json!({
            "query_embeddings": [query_vector],
            "n_results": limit,
            "include": ["metadatas", "distances"]
        });
        if let Some(ids) = ids {
            body["where"] = Self::id_filter(ids);
        }
        let response = self
            .post(&self.collection_url(&collection_id, "query"), &body, "query")
            .await?;
        let result: Value = response.json().await.map_err(|e| {
            SkillmeshError::vector_store(format!("Failed to parse response: {}", e))
        })?;

        let ids = result["ids"][0].as_array().cloned().unwrap_or_default();
        let distances = result["distances"][0].as_array().cloned().unwrap_or_default();
        let metadatas = result["metadatas"][0].as_array().cloned().unwrap_or_default();

        let results = ids
            .into_iter()
            .zip(distances)
            .enumerate()
            .filter_map(|(i, (id, distance))| {
                let id = id.as_str()?.to_string();
                let distance = distance.as_f64()? as f32;
                let payload: HashMap<String, Value> = metadatas
                    .get(i)
                    .and_then(Value::as_object)
                    .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    .unwrap_or_default();
                Some(VectorSearchResult {
                    id,
                    score: self.distance_to_score(distance),
                    payload,
                })
            })
            .collect();

        Ok(results)
    }

    async fn delete_collection(&self, name: &str) -> SkillmeshResult<()> {
        let url = format!("{}/{}", self.collections_url(), name);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| {
                SkillmeshError::vector_store(format!("Failed to delete collection: {}", e))
            })?;

        if response.status().as_u16() != 404 {
            Self::check(response, "delete collection").await?;
        }
        if name == self.config.collection_name {
            self.cache_id(None);
        }
        Ok(())
    }

    async fn collection_info(&self, name: &str) -> SkillmeshResult<CollectionInfo> {
        let collection_id = self
            .lookup_collection_id(name)
            .await?
            .ok_or_else(|| SkillmeshError::VectorStore {
                message: format!("Collection '{}' not found", name),
                code: ErrorCode::VecCollectionNotFound,
                source: None,
            })?;

        let url = self.collection_url(&collection_id, "count");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SkillmeshError::vector_store(format!("Failed to count: {}", e)))?;
        let response = Self::check(response, "count").await?;
        let vector_count: u64 = response.json().await.map_err(|e| {
            SkillmeshError::vector_store(format!("Failed to parse response: {}", e))
        })?;

        Ok(CollectionInfo {
            name: name.to_string(),
            vector_count,
            distance: self.config.distance,
        })
    }

    fn collection_name(&self) -> &str {
        &self.config.collection_name
    }
}
