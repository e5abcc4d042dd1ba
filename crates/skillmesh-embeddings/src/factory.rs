//! Factory for creating embedding providers.

use std::sync::Arc;

use skillmesh_core::error::SkillmeshResult;
use skillmesh_core::traits::{Embedder, EmbedderConfig, EmbedderProvider};

use crate::hash::HashEmbedder;
use crate::ollama::OllamaEmbedder;
use crate::openai::OpenAIEmbedder;

/// Factory for creating embedding providers.
pub struct EmbedderFactory;

impl EmbedderFactory {
    /// Create an embedder from the given configuration.
    pub fn create(
        provider: EmbedderProvider,
        config: EmbedderConfig,
    ) -> SkillmeshResult<Arc<dyn Embedder>> {
        match provider {
            EmbedderProvider::OpenAI => {
                let embedder = OpenAIEmbedder::new(config)?;
                Ok(Arc::new(embedder))
            }
            EmbedderProvider::Ollama => {
                let embedder = OllamaEmbedder::new(config)?;
                Ok(Arc::new(embedder))
            }
            EmbedderProvider::Hash => {
                let embedder = HashEmbedder::new(config.embedding_dims)?;
                Ok(Arc::new(embedder))
            }
        }
    }

    /// Create an OpenAI embedder with default configuration.
    pub fn openai() -> SkillmeshResult<Arc<dyn Embedder>> {
        Self::create(EmbedderProvider::OpenAI, EmbedderConfig::default())
    }

    /// Create an Ollama embedder with a specific model.
    pub fn ollama_with_model(
        model: impl Into<String>,
        dims: usize,
    ) -> SkillmeshResult<Arc<dyn Embedder>> {
        let config = EmbedderConfig {
            model: model.into(),
            embedding_dims: dims,
            ..Default::default()
        };
        Self::create(EmbedderProvider::Ollama, config)
    }

    /// Create a hash embedder with `dims` buckets.
    pub fn hash(dims: usize) -> SkillmeshResult<Arc<dyn Embedder>> {
        Ok(Arc::new(HashEmbedder::new(dims)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_hash_uses_configured_dims() {
        let config = EmbedderConfig {
            model: "ignored".to_string(),
            embedding_dims: 128,
            ..Default::default()
        };
        let embedder = EmbedderFactory::create(EmbedderProvider::Hash, config).unwrap();
        assert_eq!(embedder.dimension(), 128);
        assert_eq!(embedder.model_name(), "fnv1a-128");
    }

    #[test]
    fn test_create_ollama() {
        let embedder = EmbedderFactory::ollama_with_model("nomic-embed-text", 768).unwrap();
        assert_eq!(embedder.dimension(), 768);
    }
}
