//! In-memory BM25 index over card text.
//!
//! Every card contributes one entry built from its title, description,
//! domain, tags, aliases, and tool hints. The index is built once and is
//! read-only afterwards, so scoring is safe from any number of threads.

use std::collections::{BTreeSet, HashMap};

use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, TextAnalyzer, TokenStream};
use tracing::debug;

use super::config::Bm25Params;
use crate::types::CardCorpus;

/// Lowercasing tokenizer that splits on non-alphanumeric characters.
#[derive(Clone)]
pub struct Tokenizer {
    analyzer: TextAnalyzer,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            analyzer: TextAnalyzer::builder(SimpleTokenizer::default())
                .filter(LowerCaser)
                .build(),
        }
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Tokenizer(simple+lowercase)")
    }
}

impl Tokenizer {
    /// Split text into lowercase alphanumeric tokens, in order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        // TextAnalyzer needs &mut; a clone keeps the index immutable.
        let mut analyzer = self.analyzer.clone();
        let mut stream = analyzer.token_stream(text);
        let mut tokens = Vec::new();
        while stream.advance() {
            tokens.push(stream.token().text.clone());
        }
        tokens
    }
}

#[derive(Debug, Clone, Default)]
struct IndexEntry {
    term_freqs: HashMap<String, u32>,
    length: usize,
}

/// BM25 index with one entry per corpus card, in corpus order.
#[derive(Debug, Clone)]
pub struct LexicalIndex {
    params: Bm25Params,
    tokenizer: Tokenizer,
    entries: Vec<IndexEntry>,
    positions: HashMap<String, usize>,
    doc_freqs: HashMap<String, usize>,
    avg_doc_len: f32,
}

impl LexicalIndex {
    /// Build the index for a corpus.
    pub fn build(corpus: &CardCorpus, params: Bm25Params) -> Self {
        let tokenizer = Tokenizer::default();
        let mut entries = Vec::with_capacity(corpus.len());
        let mut positions = HashMap::with_capacity(corpus.len());
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();
        let mut total_len = 0usize;

        for (position, card) in corpus.iter().enumerate() {
            let mut entry = IndexEntry::default();
            for field in card.searchable_fields() {
                for token in tokenizer.tokenize(field) {
                    entry.length += 1;
                    *entry.term_freqs.entry(token).or_insert(0) += 1;
                }
            }
            for term in entry.term_freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            total_len += entry.length;
            positions.insert(card.id.clone(), position);
            entries.push(entry);
        }

        let avg_doc_len = if entries.is_empty() {
            0.0
        } else {
            total_len as f32 / entries.len() as f32
        };

        debug!(
            cards = entries.len(),
            vocabulary = doc_freqs.len(),
            avg_doc_len,
            "Built lexical index"
        );

        Self {
            params,
            tokenizer,
            entries,
            positions,
            doc_freqs,
            avg_doc_len,
        }
    }

    /// Number of indexed cards.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no cards.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Average document length in tokens.
    pub fn avg_doc_len(&self) -> f32 {
        self.avg_doc_len
    }

    /// Number of cards containing `term`.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freqs.get(term).copied().unwrap_or(0)
    }

    /// Token count of a card's indexed text.
    pub fn doc_len(&self, card_id: &str) -> Option<usize> {
        self.positions
            .get(card_id)
            .map(|&position| self.entries[position].length)
    }

    /// Tokenize free text with the index tokenizer.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    /// Distinct query terms in a fixed order.
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        self.tokenize(query)
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Inverse document frequency; always positive.
    pub fn idf(&self, term: &str) -> f32 {
        let n = self.entries.len() as f32;
        let df = self.doc_freq(term) as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// BM25 score of the card at `position` (corpus order).
    pub fn score_at(&self, position: usize, query_terms: &[String]) -> f32 {
        let Some(entry) = self.entries.get(position) else {
            return 0.0;
        };
        let Bm25Params { k1, b } = self.params;
        let avg_len = if self.avg_doc_len > 0.0 {
            self.avg_doc_len
        } else {
            1.0
        };
        let length_norm = 1.0 - b + b * (entry.length as f32 / avg_len);

        query_terms
            .iter()
            .filter_map(|term| entry.term_freqs.get(term).map(|&tf| (term, tf as f32)))
            .map(|(term, tf)| self.idf(term) * (tf * (k1 + 1.0)) / (tf + k1 * length_norm))
            .sum()
    }

    /// BM25 score of a card by id; `None` for unknown ids.
    pub fn score(&self, card_id: &str, query_terms: &[String]) -> Option<f32> {
        self.positions
            .get(card_id)
            .map(|&position| self.score_at(position, query_terms))
    }

    /// Scores for every card, in corpus order.
    pub fn score_all(&self, query_terms: &[String]) -> Vec<f32> {
        (0..self.entries.len())
            .map(|position| self.score_at(position, query_terms))
            .collect()
    }
}
