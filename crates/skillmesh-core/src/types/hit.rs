//! Retrieval hit types.

use serde::{Serialize, Serializer};
use std::sync::Arc;

use super::card::ExpertCard;

/// One ranked result of a `retrieve` call.
///
/// The card is shared with the corpus rather than copied.
#[derive(Debug, Clone)]
pub struct RetrievalHit {
    /// The matched card.
    pub card: Arc<ExpertCard>,
    /// Fused ranking score.
    pub score: f32,
    /// Raw BM25 score.
    pub sparse_score: f32,
    /// Raw dense similarity, `None` when dense scoring was not applied to this card.
    pub dense_score: Option<f32>,
}

impl RetrievalHit {
    /// Id of the matched card.
    pub fn id(&self) -> &str {
        &self.card.id
    }
}

#[derive(Serialize)]
struct HitPayload<'a> {
    #[serde(flatten)]
    card: &'a ExpertCard,
    score: f32,
    sparse_score: f32,
    dense_score: Option<f32>,
}

impl Serialize for RetrievalHit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        HitPayload {
            card: &self.card,
            score: self.score,
            sparse_score: self.sparse_score,
            dense_score: self.dense_score,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_serializes_flat_payload() {
        let card = ExpertCard::new("cv.opencv-image-processing", "OpenCV contour detection")
            .with_risk_level("low");
        let hit = RetrievalHit {
            card: Arc::new(card),
            score: 1.5,
            sparse_score: 1.5,
            dense_score: None,
        };

        let value = serde_json::to_value(&hit).unwrap();
        assert_eq!(value["id"], "cv.opencv-image-processing");
        assert_eq!(value["risk_level"], "low");
        assert_eq!(value["score"], 1.5);
        assert!(value["dense_score"].is_null());
        assert!(value.get("dependencies").is_some());
        assert!(value.get("metadata").is_some());
    }
}
