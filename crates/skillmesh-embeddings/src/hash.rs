//! Deterministic feature-hashing embedder.
//!
//! Maps each lowercase word to a bucket with 64-bit FNV-1a and L2-normalizes
//! the bucket counts. Needs no model or network, so it suits offline use and
//! tests of the dense path.

use async_trait::async_trait;

use skillmesh_core::error::{SkillmeshError, SkillmeshResult};
use skillmesh_core::traits::{Embedder, EmbeddingAction};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Default vector width.
pub const DEFAULT_HASH_DIMS: usize = 256;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Feature-hashing embedder.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dims: usize,
    name: String,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dims: DEFAULT_HASH_DIMS,
            name: format!("fnv1a-{}", DEFAULT_HASH_DIMS),
        }
    }
}

impl HashEmbedder {
    /// Create an embedder with `dims` buckets.
    pub fn new(dims: usize) -> SkillmeshResult<Self> {
        if dims == 0 {
            return Err(SkillmeshError::configuration("Hash embedder needs at least one dimension"));
        }
        Ok(Self {
            dims,
            name: format!("fnv1a-{}", dims),
        })
    }

    /// Embed synchronously.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dims];
        let lower = text.to_lowercase();
        for word in lower.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let bucket = (fnv1a(word.as_bytes()) % self.dims as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(
        &self,
        text: &str,
        _action: Option<EmbeddingAction>,
    ) -> SkillmeshResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        _action: Option<EmbeddingAction>,
    ) -> SkillmeshResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_fnv1a_known_values() {
        assert_eq!(fnv1a(b""), FNV_OFFSET);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_unit_length_and_deterministic() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed_text("Detect contours with OpenCV");
        let b = embedder.embed_text("detect CONTOURS with opencv!");
        assert_eq!(a.len(), DEFAULT_HASH_DIMS);
        assert_eq!(a, b);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(16).unwrap();
        assert!(embedder.embed_text(" ... ").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_overlap_increases_similarity() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed_text("image contour detection");
        let close = embedder.embed_text("contour detection in an image");
        let far = embedder.embed_text("summarize legal documents");
        assert!(dot(&query, &close) > dot(&query, &far));
    }

    #[test]
    fn test_zero_dims_rejected() {
        assert!(HashEmbedder::new(0).is_err());
    }

    #[tokio::test]
    async fn test_batch_matches_single() {
        let embedder = HashEmbedder::new(64).unwrap();
        let texts = vec!["alpha beta".to_string(), "gamma".to_string()];
        let batch = embedder.embed_batch(&texts, None).await.unwrap();
        assert_eq!(batch[1], embedder.embed("gamma", None).await.unwrap());
        assert_eq!(embedder.model_name(), "fnv1a-64");
    }
}
