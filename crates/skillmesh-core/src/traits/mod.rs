//! Core traits for skillmesh providers.

mod embedder;
mod similarity;
mod vector_store;

pub use embedder::*;
pub use similarity::*;
pub use vector_store::*;
