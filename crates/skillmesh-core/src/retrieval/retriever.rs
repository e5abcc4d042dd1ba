//! Retriever facade: corpus, lexical index, and resolved backend.

use std::collections::HashMap;
use tracing::{debug, info, instrument};

use super::backend::SimilarityBackendKind;
use super::config::{validate_top_k, RetrieverConfig};
use super::fusion::{Candidate, ScoreFusion};
use super::lexical::LexicalIndex;
use super::selector::BackendSelector;
use crate::error::SkillmeshResult;
use crate::traits::{DenseProvider, SimilarityBackend};
use crate::types::{CardCorpus, ExpertCard, RetrievalHit};

/// Hybrid card retriever.
///
/// Built once through [`Retriever::build`]; afterwards `retrieve` is the only
/// operation and never mutates engine state.
#[derive(Debug)]
pub struct Retriever {
    corpus: CardCorpus,
    candidate_ids: Vec<String>,
    index: LexicalIndex,
    backend: SimilarityBackendKind,
    fusion: ScoreFusion,
    config: RetrieverConfig,
    dense_active: bool,
}

impl Retriever {
    /// Validate the config, index the corpus, and resolve the backend.
    pub async fn build(
        corpus: CardCorpus,
        config: RetrieverConfig,
        dense_provider: Option<&dyn DenseProvider>,
    ) -> SkillmeshResult<Self> {
        config.validate()?;

        let index = LexicalIndex::build(&corpus, config.bm25);
        let backend =
            BackendSelector::resolve(config.backend, config.use_dense, &corpus, dense_provider)
                .await?;
        let dense_active = config.use_dense && backend.supports_dense();

        info!(
            cards = corpus.len(),
            backend = backend.name(),
            requested = %config.backend,
            dense_active,
            "Retriever built"
        );

        Ok(Self {
            candidate_ids: corpus.ids(),
            corpus,
            index,
            backend,
            fusion: ScoreFusion::new(config.weights),
            config,
            dense_active,
        })
    }

    /// Build from raw cards, checking id uniqueness first.
    pub async fn from_cards(
        cards: Vec<ExpertCard>,
        config: RetrieverConfig,
        dense_provider: Option<&dyn DenseProvider>,
    ) -> SkillmeshResult<Self> {
        let corpus = CardCorpus::new(cards)?;
        Self::build(corpus, config, dense_provider).await
    }

    /// Top-k cards for `query`, best first.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn retrieve(&self, query: &str, top_k: usize) -> SkillmeshResult<Vec<RetrievalHit>> {
        let top_k = validate_top_k(top_k)?;
        if self.corpus.is_empty() {
            return Ok(Vec::new());
        }

        let terms = self.index.query_terms(query);
        if terms.is_empty() {
            debug!("Query has no tokens");
            return Ok(Vec::new());
        }

        let sparse = self.index.score_all(&terms);
        let dense: HashMap<String, f32> = if self.dense_active {
            self.backend.query(query, &self.candidate_ids, top_k).await?
        } else {
            HashMap::new()
        };

        let candidates = self
            .corpus
            .iter()
            .zip(sparse)
            .map(|(card, sparse)| Candidate {
                dense: dense.get(&card.id).copied(),
                card: card.clone(),
                sparse,
            })
            .collect();

        let hits = self.fusion.rank(candidates, self.dense_active, top_k);
        debug!(hits = hits.len(), "Retrieval complete");
        Ok(hits)
    }

    /// Whether dense similarity contributes to ranking.
    pub fn dense_active(&self) -> bool {
        self.dense_active
    }

    /// Name of the resolved backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Cards this retriever ranks.
    pub fn corpus(&self) -> &CardCorpus {
        &self.corpus
    }

    /// Configuration the retriever was built with.
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }
}
