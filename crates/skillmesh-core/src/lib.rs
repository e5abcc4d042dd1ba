//! skillmesh-core - Core library for skillmesh.
//!
//! This crate provides the card types, provider traits, registry loader, and
//! the hybrid retrieval engine that picks the top-k expert cards for a query.
//!
//! # Example
//!
//! ```ignore
//! use skillmesh_core::{load_corpus, Retriever, RetrieverConfig};
//!
//! let corpus = load_corpus("tools.registry.yaml")?;
//! let retriever = Retriever::build(corpus, RetrieverConfig::memory(), None).await?;
//!
//! for hit in retriever.retrieve("detect contours in an image", 3).await? {
//!     println!("{} {:.3}", hit.id(), hit.score);
//! }
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod render;
pub mod retrieval;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{EmbedderProviderConfig, SkillmeshConfig};
pub use error::{ErrorCode, SkillmeshError, SkillmeshResult};
pub use registry::{load_corpus, load_registry, resolve_registry_path};
pub use render::{render_claude_context, render_codex_context, ContextProvider};
pub use retrieval::{
    index_corpus, validate_top_k, BackendMode, BackendSelector, Bm25Params, FusionWeights,
    Retriever, RetrieverConfig,
};
pub use traits::{
    DenseComponents, DenseProvider, Embedder, EmbedderConfig, EmbeddingAction, SimilarityBackend,
    VectorStore, VectorStoreConfig,
};
pub use types::{CardCorpus, ExpertCard, RetrievalHit};
