//! Configuration system for skillmesh.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ErrorCode, SkillmeshError, SkillmeshResult};
use crate::retrieval::{BackendMode, RetrieverConfig};
use crate::traits::{EmbedderConfig, EmbedderProvider, VectorStoreConfig};

/// Embedder provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedderProviderConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: EmbedderProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: EmbedderConfig,
}

/// Main skillmesh configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillmeshConfig {
    /// Registry file; falls back to `SKILLMESH_REGISTRY` and then the default location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<PathBuf>,
    /// Retrieval settings.
    pub retrieval: RetrieverConfig,
    /// Embedder configuration for the dense path.
    pub embedder: EmbedderProviderConfig,
    /// Vector store configuration for the dense path.
    pub vector_store: VectorStoreConfig,
}

fn invalid_file(message: impl Into<String>) -> SkillmeshError {
    SkillmeshError::configuration_with(
        ErrorCode::CfgInvalidFile,
        message,
        "Use a valid .toml, .json, or .yaml configuration file",
    )
}

impl SkillmeshConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> SkillmeshResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| invalid_file(e.to_string()))?,
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| invalid_file(e.to_string()))?
            }
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| invalid_file(e.to_string()))?
            }
            _ => {
                return Err(invalid_file(
                    "Unsupported config file format. Use .toml, .json, or .yaml",
                ))
            }
        };
        config.retrieval.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> SkillmeshResult<Self> {
        let mut config = Self::default();

        if let Some(path) = env_value("SKILLMESH_REGISTRY") {
            config.registry_path = Some(PathBuf::from(path));
        }
        if let Some(backend) = env_value("SKILLMESH_BACKEND") {
            config.retrieval.backend = BackendMode::parse(&backend)?;
        }
        if let Some(dense) = env_value("SKILLMESH_DENSE") {
            config.retrieval.use_dense = parse_flag(&dense)?;
        }

        // Embedder configuration
        if let Some(provider) = env_value("SKILLMESH_EMBEDDER") {
            config.embedder.provider = match provider.to_lowercase().as_str() {
                "openai" => EmbedderProvider::OpenAI,
                "ollama" => EmbedderProvider::Ollama,
                "hash" => EmbedderProvider::Hash,
                other => {
                    return Err(SkillmeshError::configuration(format!(
                        "Unknown embedder provider '{}'",
                        other
                    )))
                }
            };
        }
        if let Some(model) = env_value("SKILLMESH_EMBEDDING_MODEL") {
            config.embedder.config.model = model;
        }
        if let Some(api_key) = env_value("OPENAI_API_KEY") {
            config.embedder.config.api_key = Some(api_key);
        }

        // Vector store configuration
        if let Some(url) = env_value("SKILLMESH_CHROMA_URL") {
            config.vector_store.url = Some(url);
        }
        if let Some(collection) = env_value("SKILLMESH_COLLECTION") {
            config.vector_store.collection_name = collection;
        }

        Ok(config)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> SkillmeshConfigBuilder {
        SkillmeshConfigBuilder::default()
    }

    /// Registry path after env and default fallbacks.
    pub fn resolved_registry_path(&self) -> PathBuf {
        crate::registry::resolve_registry_path(
            self.registry_path.as_deref().and_then(|p| p.to_str()),
        )
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> SkillmeshResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SkillmeshError::configuration(format!(
            "Invalid boolean flag '{}'",
            other
        ))),
    }
}

/// Builder for SkillmeshConfig.
#[derive(Default)]
pub struct SkillmeshConfigBuilder {
    config: SkillmeshConfig,
}

impl SkillmeshConfigBuilder {
    /// Set the registry path.
    pub fn registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.registry_path = Some(path.into());
        self
    }

    /// Set retrieval configuration.
    pub fn retrieval(mut self, config: RetrieverConfig) -> Self {
        self.config.retrieval = config;
        self
    }

    /// Set embedder configuration.
    pub fn embedder(mut self, config: EmbedderProviderConfig) -> Self {
        self.config.embedder = config;
        self
    }

    /// Set vector store configuration.
    pub fn vector_store(mut self, config: VectorStoreConfig) -> Self {
        self.config.vector_store = config;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> SkillmeshConfig {
        self.config
    }
}
