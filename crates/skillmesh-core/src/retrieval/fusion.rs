//! Score fusion and ranking.
//!
//! Blends the BM25 signal with dense similarity using min-max normalization
//! and a weighted sum, drops candidates with no signal on any axis, and
//! produces a deterministic total order (score descending, card id ascending).

use std::cmp::Ordering;
use std::sync::Arc;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::types::{ExpertCard, RetrievalHit};

/// Weights for linear sparse/dense fusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    /// Weight for the normalized BM25 score.
    pub sparse: f32,
    /// Weight for the normalized dense similarity.
    pub dense: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            sparse: 0.6,
            dense: 0.4,
        }
    }
}

impl FusionWeights {
    /// Validate that weights are usable.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.sparse.is_finite() || !self.dense.is_finite() {
            return Err("Fusion weights must be finite");
        }
        if self.sparse < 0.0 || self.dense < 0.0 {
            return Err("Fusion weights must be non-negative");
        }
        if self.sparse + self.dense <= 0.0 {
            return Err("At least one fusion weight must be positive");
        }
        Ok(())
    }
}

/// Per-card signals collected for one query.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The card being scored.
    pub card: Arc<ExpertCard>,
    /// Raw BM25 score.
    pub sparse: f32,
    /// Raw dense similarity, if the backend scored this card.
    pub dense: Option<f32>,
}

impl Candidate {
    fn has_signal(&self) -> bool {
        self.sparse > 0.0 || self.dense.is_some_and(|d| d > 0.0)
    }
}

/// Linear fusion plus filtering, ordering, and truncation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreFusion {
    weights: FusionWeights,
}

impl ScoreFusion {
    /// Create a fusion stage with the given weights.
    pub fn new(weights: FusionWeights) -> Self {
        Self { weights }
    }

    /// Fusion weights in use.
    pub fn weights(&self) -> FusionWeights {
        self.weights
    }

    /// Fuse, filter, sort, and truncate the candidate set.
    ///
    /// Normalization spans the full candidate set, so callers must pass every
    /// scored card rather than a pre-filtered subset.
    pub fn rank(
        &self,
        candidates: Vec<Candidate>,
        dense_active: bool,
        top_k: usize,
    ) -> Vec<RetrievalHit> {
        let mut hits: Vec<RetrievalHit> = if dense_active {
            self.fuse_dense(candidates)
        } else {
            candidates
                .into_iter()
                .filter(|c| c.sparse > 0.0)
                .map(|c| RetrievalHit {
                    card: c.card,
                    score: c.sparse,
                    sparse_score: c.sparse,
                    dense_score: None,
                })
                .collect()
        };

        hits.sort_by(compare_hits);
        hits.truncate(top_k);
        hits
    }

    fn fuse_dense(&self, candidates: Vec<Candidate>) -> Vec<RetrievalHit> {
        let sparse: Vec<f32> = candidates.iter().map(|c| c.sparse).collect();
        let dense: Vec<f32> = candidates.iter().map(|c| c.dense.unwrap_or(0.0)).collect();
        let sparse_norm = min_max_normalize(&sparse);
        let dense_norm = min_max_normalize(&dense);

        candidates
            .into_iter()
            .zip(sparse_norm.into_iter().zip(dense_norm))
            .filter(|(c, _)| c.has_signal())
            .map(|(c, (s, d))| RetrievalHit {
                score: self.weights.sparse * s + self.weights.dense * d,
                sparse_score: c.sparse,
                dense_score: c.dense,
                card: c.card,
            })
            .collect()
    }
}

/// Score descending, then card id ascending.
pub fn compare_hits(a: &RetrievalHit, b: &RetrievalHit) -> Ordering {
    OrderedFloat(b.score)
        .cmp(&OrderedFloat(a.score))
        .then_with(|| a.card.id.cmp(&b.card.id))
}

/// Min-max normalize into `[0, 1]`; a constant signal maps to all zeros.
pub fn min_max_normalize(values: &[f32]) -> Vec<f32> {
    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}
