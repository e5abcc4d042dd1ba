//! Backend resolution with the auto-degrade policy.

use tracing::{info, warn};

use super::backend::{MemoryBackend, SimilarityBackendKind, VectorBackend};
use super::config::BackendMode;
use crate::error::{SkillmeshError, SkillmeshResult};
use crate::traits::DenseProvider;
use crate::types::CardCorpus;

/// Maps a requested mode to a concrete backend, exactly once per retriever.
pub struct BackendSelector;

impl BackendSelector {
    /// Resolve the backend for `mode`.
    ///
    /// `chroma` fails with `BackendUnavailable` when the vector backend cannot
    /// be built. `auto` only connects when `use_dense` is set and falls back to
    /// the memory backend on any failure.
    pub async fn resolve(
        mode: BackendMode,
        use_dense: bool,
        corpus: &CardCorpus,
        dense_provider: Option<&dyn DenseProvider>,
    ) -> SkillmeshResult<SimilarityBackendKind> {
        match mode {
            BackendMode::Memory => Ok(SimilarityBackendKind::Memory(MemoryBackend)),
            BackendMode::Chroma => Self::connect(corpus, dense_provider)
                .await
                .map(SimilarityBackendKind::Vector)
                .map_err(|e| SkillmeshError::backend_unavailable(mode.to_string(), e)),
            BackendMode::Auto if !use_dense => Ok(SimilarityBackendKind::Memory(MemoryBackend)),
            BackendMode::Auto => match Self::connect(corpus, dense_provider).await {
                Ok(backend) => Ok(SimilarityBackendKind::Vector(backend)),
                Err(e) => {
                    warn!(error = %e, "Dense backend unavailable, falling back to lexical scoring");
                    Ok(SimilarityBackendKind::Memory(MemoryBackend))
                }
            },
        }
    }

    async fn connect(
        corpus: &CardCorpus,
        dense_provider: Option<&dyn DenseProvider>,
    ) -> SkillmeshResult<VectorBackend> {
        let provider = dense_provider.ok_or_else(|| {
            SkillmeshError::configuration("No embedder or vector store configured for dense search")
        })?;
        let components = provider.connect().await?;
        info!(?components, "Connecting vector backend");
        VectorBackend::connect(corpus, components).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::testing::{components, UnreachableProvider};
    use crate::traits::SimilarityBackend;
    use crate::types::ExpertCard;

    fn corpus() -> CardCorpus {
        CardCorpus::new(vec![ExpertCard::new("cv.opencv", "OpenCV")]).unwrap()
    }

    #[tokio::test]
    async fn test_memory_always_succeeds() {
        let provider = UnreachableProvider;
        let backend =
            BackendSelector::resolve(BackendMode::Memory, true, &corpus(), Some(&provider))
                .await
                .unwrap();
        assert_eq!(backend.name(), "memory");
    }

    #[tokio::test]
    async fn test_chroma_failure_is_fatal() {
        let provider = UnreachableProvider;
        let err = BackendSelector::resolve(BackendMode::Chroma, true, &corpus(), Some(&provider))
            .await
            .unwrap_err();
        assert!(err.is_backend_unavailable());
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_chroma_without_provider_is_fatal() {
        let err = BackendSelector::resolve(BackendMode::Chroma, false, &corpus(), None)
            .await
            .unwrap_err();
        assert!(err.is_backend_unavailable());
    }

    #[tokio::test]
    async fn test_auto_degrades_on_failure() {
        let provider = UnreachableProvider;
        let backend = BackendSelector::resolve(BackendMode::Auto, true, &corpus(), Some(&provider))
            .await
            .unwrap();
        assert!(!backend.supports_dense());
    }

    #[tokio::test]
    async fn test_auto_without_dense_does_not_connect() {
        let (_, store, components) = components();
        let backend =
            BackendSelector::resolve(BackendMode::Auto, false, &corpus(), Some(&components))
                .await
                .unwrap();
        assert_eq!(backend.name(), "memory");
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_auto_with_dense_connects() {
        let (_, store, components) = components();
        let backend =
            BackendSelector::resolve(BackendMode::Auto, true, &corpus(), Some(&components))
                .await
                .unwrap();
        assert!(backend.supports_dense());
        assert_eq!(store.records.lock().unwrap().len(), 1);
    }
}
