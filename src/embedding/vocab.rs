use std::collections::HashMap;

use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Exponent flattening the unigram distribution for negative sampling.
const UNIGRAM_POWER: f64 = 0.75;

/// Indexed vocabulary for embedding training.
///
/// Words are ordered by descending corpus count (ties broken
/// alphabetically), so index 0 is always the most frequent word. The order
/// is part of the vocabulary's identity: embedding matrix rows are
/// addressed by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    words: IndexMap<String, u64>,
    total: u64,
}

impl Vocabulary {
    /// Counts words across the tokenized sentences and keeps those seen at
    /// least `min_count` times.
    pub fn build<S: AsRef<str>>(sentences: &[Vec<S>], min_count: u64) -> Self {
        let mut counts: HashMap<String, u64, RandomState> =
            HashMap::with_hasher(RandomState::new());
        for sentence in sentences {
            for word in sentence {
                *counts.entry(word.as_ref().to_string()).or_insert(0) += 1;
            }
        }
        let mut kept: Vec<(String, u64)> = counts
            .into_iter()
            .filter(|(_, count)| *count >= min_count)
            .collect();
        kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let total = kept.iter().map(|(_, c)| c).sum();
        Self {
            words: kept.into_iter().collect(),
            total,
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Sum of the kept words' counts.
    pub fn total_count(&self) -> u64 {
        self.total
    }

    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.words.get_index_of(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Word at `index`, `None` past the end.
    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get_index(index).map(|(w, _)| w.as_str())
    }

    /// Corpus count of the word at `index`, zero past the end.
    pub fn count_at(&self, index: usize) -> u64 {
        self.words.get_index(index).map_or(0, |(_, c)| *c)
    }

    /// Words with counts, most frequent first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.words.iter().map(|(w, c)| (w.as_str(), *c))
    }

    /// Maps tokens to vocabulary indices, silently skipping unknown words.
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<usize> {
        tokens
            .iter()
            .filter_map(|t| self.index_of(t.as_ref()))
            .collect()
    }

    /// Sampling weights for the negative-sampling table, index-aligned.
    /// Raising counts to the 3/4 power keeps rare words reachable.
    pub fn unigram_weights(&self) -> Vec<f64> {
        self.words
            .values()
            .map(|&count| (count as f64).powf(UNIGRAM_POWER))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences() -> Vec<Vec<&'static str>> {
        vec![
            vec!["gato", "dorme", "gato"],
            vec!["gato", "come", "peixe"],
            vec!["peixe", "nada"],
        ]
    }

    #[test]
    fn build_filters_by_min_count_and_ranks_by_frequency() {
        let vocab = Vocabulary::build(&sentences(), 2);
        assert_eq!(vocab.len(), 2);
        // "gato" appears 3 times, "peixe" twice.
        assert_eq!(vocab.word(0), Some("gato"));
        assert_eq!(vocab.word(1), Some("peixe"));
        assert!(!vocab.contains("nada"));
        assert_eq!(vocab.total_count(), 5);
    }

    #[test]
    fn ties_break_alphabetically_for_a_stable_order() {
        let sentences = vec![vec!["beta", "alfa", "beta", "alfa"]];
        let vocab = Vocabulary::build(&sentences, 1);
        assert_eq!(vocab.word(0), Some("alfa"));
        assert_eq!(vocab.word(1), Some("beta"));
    }

    #[test]
    fn encode_skips_unknown_words() {
        let vocab = Vocabulary::build(&sentences(), 2);
        let encoded = vocab.encode(&["gato", "voa", "peixe"]);
        assert_eq!(encoded, vec![0, 1]);
    }

    #[test]
    fn unigram_weights_follow_the_three_quarter_power() {
        let vocab = Vocabulary::build(&sentences(), 2);
        let weights = vocab.unigram_weights();
        assert_eq!(weights.len(), 2);
        assert!((weights[0] - 3f64.powf(0.75)).abs() < 1e-12);
        assert!((weights[1] - 2f64.powf(0.75)).abs() < 1e-12);
    }

    #[test]
    fn min_count_one_keeps_everything() {
        let vocab = Vocabulary::build(&sentences(), 1);
        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.count_at(0), 3);
    }
}
