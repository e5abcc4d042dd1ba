//! Builds retrievers from server configuration.

use async_trait::async_trait;
use tracing::debug;

use skillmesh_core::error::SkillmeshResult;
use skillmesh_core::traits::VectorStoreConfig;
use skillmesh_core::{
    CardCorpus, DenseComponents, DenseProvider, EmbedderProviderConfig, Retriever, RetrieverConfig,
    SkillmeshConfig,
};
use skillmesh_embeddings::EmbedderFactory;
use skillmesh_vector_stores::VectorStoreFactory;

/// Dense provider that constructs the configured embedder and vector store on demand.
#[derive(Debug, Clone)]
pub struct ConfiguredDenseProvider {
    embedder: EmbedderProviderConfig,
    vector_store: VectorStoreConfig,
}

impl ConfiguredDenseProvider {
    pub fn new(embedder: EmbedderProviderConfig, vector_store: VectorStoreConfig) -> Self {
        Self {
            embedder,
            vector_store,
        }
    }

    pub fn from_config(config: &SkillmeshConfig) -> Self {
        Self::new(config.embedder.clone(), config.vector_store.clone())
    }
}

#[async_trait]
impl DenseProvider for ConfiguredDenseProvider {
    async fn connect(&self) -> SkillmeshResult<DenseComponents> {
        debug!(
            embedder = ?self.embedder.provider,
            store = ?self.vector_store.provider,
            collection = %self.vector_store.collection_name,
            "Connecting dense components"
        );
        let embedder =
            EmbedderFactory::create(self.embedder.provider, self.embedder.config.clone())?;
        let store = VectorStoreFactory::create(self.vector_store.clone()).await?;
        Ok(DenseComponents::new(embedder, store).with_distance(self.vector_store.distance))
    }
}

/// Build a retriever over `corpus` using the configured dense stack.
pub async fn build_retriever(
    config: &SkillmeshConfig,
    corpus: CardCorpus,
    retrieval: RetrieverConfig,
) -> SkillmeshResult<Retriever> {
    let provider = ConfiguredDenseProvider::from_config(config);
    Retriever::build(corpus, retrieval, Some(&provider)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillmesh_core::traits::{EmbedderProvider, VectorStoreProvider};
    use skillmesh_core::{BackendMode, EmbedderConfig, ExpertCard};

    fn hash_memory_config() -> SkillmeshConfig {
        SkillmeshConfig::builder()
            .embedder(EmbedderProviderConfig {
                provider: EmbedderProvider::Hash,
                config: EmbedderConfig {
                    embedding_dims: 64,
                    ..Default::default()
                },
            })
            .vector_store(VectorStoreConfig {
                provider: VectorStoreProvider::Memory,
                collection_name: "factory_cards".to_string(),
                ..Default::default()
            })
            .build()
    }

    #[tokio::test]
    async fn test_connect_hash_and_memory() {
        let provider = ConfiguredDenseProvider::from_config(&hash_memory_config());
        let components = provider.connect().await.unwrap();
        assert_eq!(components.embedder.dimension(), 64);
        assert_eq!(components.store.collection_name(), "factory_cards");
    }

    #[tokio::test]
    async fn test_build_retriever_dense_chroma_mode_with_memory_store() {
        let config = hash_memory_config();
        let corpus = CardCorpus::new(vec![
            ExpertCard::new("cv.opencv", "OpenCV contour detection"),
            ExpertCard::new("nlp.summarizer", "Text summarization"),
        ])
        .unwrap();
        let retrieval = RetrieverConfig::default()
            .with_backend(BackendMode::Chroma)
            .with_dense(true);

        let retriever = build_retriever(&config, corpus, retrieval).await.unwrap();
        assert!(retriever.dense_active());

        let hits = retriever.retrieve("opencv contour", 2).await.unwrap();
        assert_eq!(hits[0].id(), "cv.opencv");
        assert!(hits[0].dense_score.is_some());
    }
}
