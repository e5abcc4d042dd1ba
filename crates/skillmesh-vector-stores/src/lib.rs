//! skillmesh-vector-stores - Vector store implementations for skillmesh.
//!
//! # Supported Backends
//!
//! - **Chroma** (feature: `chroma`, default) - Chroma server over its REST API
//! - **Memory** (always available) - in-process brute-force store
//!
//! # Example
//!
//! ```ignore
//! use skillmesh_vector_stores::VectorStoreFactory;
//!
//! let store = VectorStoreFactory::chroma("skillmesh_experts", "http://localhost:8000").await?;
//! let scratch = VectorStoreFactory::memory("skillmesh_experts");
//! ```

mod factory;
mod memory;

#[cfg(feature = "chroma")]
mod chroma;

pub use factory::VectorStoreFactory;
pub use memory::MemoryVectorStore;

#[cfg(feature = "chroma")]
pub use chroma::ChromaVectorStore;

// Re-export core types for convenience
pub use skillmesh_core::traits::{
    CollectionInfo, DistanceMetric, VectorRecord, VectorSearchResult, VectorStore,
    VectorStoreConfig, VectorStoreProvider,
};
