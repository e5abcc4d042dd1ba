//! skillmesh-embeddings - Embedding provider implementations for skillmesh.
//!
//! # Supported Providers
//!
//! - **OpenAI** (feature: `openai`) - text-embedding-3-small, text-embedding-3-large, etc.
//! - **Ollama** (feature: `ollama`) - Local embedding models via Ollama
//! - **Hash** (always available) - FNV-1a feature hashing, no model required
//!
//! # Example
//!
//! ```ignore
//! use skillmesh_embeddings::EmbedderFactory;
//!
//! let embedder = EmbedderFactory::openai()?;
//! let offline = EmbedderFactory::hash(256)?;
//! ```

mod factory;
mod hash;
mod ollama;
mod openai;

pub use factory::EmbedderFactory;
pub use hash::{HashEmbedder, DEFAULT_HASH_DIMS};
pub use ollama::OllamaEmbedder;
pub use openai::OpenAIEmbedder;

// Re-export core types for convenience
pub use skillmesh_core::traits::{Embedder, EmbedderConfig, EmbedderProvider, EmbeddingAction};
