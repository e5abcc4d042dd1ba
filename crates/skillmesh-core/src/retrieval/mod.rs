//! Hybrid card retrieval.
//!
//! A query is scored lexically (BM25) against every card and, when a dense
//! backend is active, by embedding similarity. The two signals are fused,
//! filtered, ordered, and truncated to `top_k`:
//!
//! ```text
//! query ──► LexicalIndex ──────┐
//!    │                         ├──► ScoreFusion ──► Vec<RetrievalHit>
//!    └────► SimilarityBackend ─┘
//! ```

mod backend;
mod config;
mod fusion;
mod lexical;
mod retriever;
mod selector;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{index_corpus, MemoryBackend, SimilarityBackendKind, VectorBackend};
pub use config::{validate_top_k, BackendMode, Bm25Params, RetrieverConfig};
pub use fusion::{compare_hits, min_max_normalize, Candidate, FusionWeights, ScoreFusion};
pub use lexical::{LexicalIndex, Tokenizer};
pub use retriever::Retriever;
pub use selector::BackendSelector;
