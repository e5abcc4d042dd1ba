//! Card corpus.

use std::collections::HashMap;
use std::sync::Arc;

use super::card::ExpertCard;
use crate::error::{SkillmeshError, SkillmeshResult};

/// Immutable, ordered set of cards with unique ids.
#[derive(Debug, Clone, Default)]
pub struct CardCorpus {
    cards: Vec<Arc<ExpertCard>>,
    positions: HashMap<String, usize>,
}

impl CardCorpus {
    /// Build a corpus, rejecting empty and duplicate ids.
    pub fn new(cards: Vec<ExpertCard>) -> SkillmeshResult<Self> {
        let mut positions = HashMap::with_capacity(cards.len());
        let mut shared = Vec::with_capacity(cards.len());

        for (position, card) in cards.into_iter().enumerate() {
            if card.id.trim().is_empty() {
                return Err(SkillmeshError::empty_card_id(position));
            }
            if positions.insert(card.id.clone(), position).is_some() {
                return Err(SkillmeshError::duplicate_card(card.id));
            }
            shared.push(Arc::new(card));
        }

        Ok(Self {
            cards: shared,
            positions,
        })
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the corpus has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in load order.
    pub fn cards(&self) -> &[Arc<ExpertCard>] {
        &self.cards
    }

    /// Iterate cards in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ExpertCard>> {
        self.cards.iter()
    }

    /// Look up a card by id.
    pub fn get(&self, id: &str) -> Option<&Arc<ExpertCard>> {
        self.positions.get(id).map(|&i| &self.cards[i])
    }

    /// Whether a card with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// All card ids in load order.
    pub fn ids(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.id.clone()).collect()
    }
}
