//! Ollama embedding provider implementation.

use async_trait::async_trait;

use skillmesh_core::error::{SkillmeshError, SkillmeshResult};
use skillmesh_core::traits::{Embedder, EmbedderConfig, EmbeddingAction};

#[cfg(feature = "ollama")]
use ollama_rs::{
    generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest},
    Ollama,
};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama embedding provider.
#[derive(Debug)]
pub struct OllamaEmbedder {
    #[cfg(feature = "ollama")]
    client: Ollama,
    config: EmbedderConfig,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder.
    pub fn new(config: EmbedderConfig) -> SkillmeshResult<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        let url = url::Url::parse(&base_url)
            .map_err(|e| SkillmeshError::configuration(format!("Invalid Ollama URL: {}", e)))?;

        let host = url.host_str().unwrap_or("localhost").to_string();
        let port = url.port().unwrap_or(11434);

        #[cfg(feature = "ollama")]
        let client = Ollama::new(format!("{}://{}", url.scheme(), host), port);
        #[cfg(not(feature = "ollama"))]
        let _ = (host, port);

        Ok(Self {
            #[cfg(feature = "ollama")]
            client,
            config,
        })
    }

    #[cfg(feature = "ollama")]
    async fn request(&self, input: EmbeddingsInput) -> SkillmeshResult<Vec<Vec<f32>>> {
        let request = GenerateEmbeddingsRequest::new(self.config.model.clone(), input);
        let response = self
            .client
            .generate_embeddings(request)
            .await
            .map_err(|e| SkillmeshError::embedding(format!("Ollama embedding error: {}", e)))?;
        Ok(response.embeddings)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[cfg(feature = "ollama")]
    async fn embed(
        &self,
        text: &str,
        _action: Option<EmbeddingAction>,
    ) -> SkillmeshResult<Vec<f32>> {
        self.request(EmbeddingsInput::Single(text.to_string()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SkillmeshError::embedding("No embedding returned"))
    }

    #[cfg(not(feature = "ollama"))]
    async fn embed(
        &self,
        _text: &str,
        _action: Option<EmbeddingAction>,
    ) -> SkillmeshResult<Vec<f32>> {
        Err(SkillmeshError::configuration(
            "Ollama feature not enabled. Enable the 'ollama' feature.",
        ))
    }

    #[cfg(feature = "ollama")]
    async fn embed_batch(
        &self,
        texts: &[String],
        _action: Option<EmbeddingAction>,
    ) -> SkillmeshResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(EmbeddingsInput::Multiple(texts.to_vec())).await
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dims
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        let config = EmbedderConfig {
            base_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(OllamaEmbedder::new(config).unwrap_err().is_configuration());
    }
}
