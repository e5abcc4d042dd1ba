//! Factory for creating vector store providers.

use std::sync::Arc;

use skillmesh_core::error::{SkillmeshError, SkillmeshResult};
use skillmesh_core::traits::{VectorStore, VectorStoreConfig, VectorStoreProvider};

use crate::memory::MemoryVectorStore;

/// Factory for creating vector store providers.
pub struct VectorStoreFactory;

impl VectorStoreFactory {
    /// Create (and connect) the store named by `config.provider`.
    pub async fn create(config: VectorStoreConfig) -> SkillmeshResult<Arc<dyn VectorStore>> {
        match config.provider {
            #[cfg(feature = "chroma")]
            VectorStoreProvider::Chroma => {
                let store = crate::chroma::ChromaVectorStore::new(config).await?;
                Ok(Arc::new(store))
            }

            VectorStoreProvider::Memory => Ok(Arc::new(MemoryVectorStore::from_config(&config))),

            #[allow(unreachable_patterns)]
            provider => Err(SkillmeshError::UnsupportedProvider {
                provider: format!("{:?} (feature not compiled in)", provider),
            }),
        }
    }

    /// Create a Chroma store for `collection_name` at `url`.
    #[cfg(feature = "chroma")]
    pub async fn chroma(collection_name: &str, url: &str) -> SkillmeshResult<Arc<dyn VectorStore>> {
        let config = VectorStoreConfig {
            provider: VectorStoreProvider::Chroma,
            collection_name: collection_name.to_string(),
            url: Some(url.to_string()),
            ..Default::default()
        };
        Self::create(config).await
    }

    /// Create an in-process store for `collection_name`.
    pub fn memory(collection_name: &str) -> Arc<dyn VectorStore> {
        Arc::new(MemoryVectorStore::new(collection_name))
    }
}
