pub mod train;
pub mod vocab;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EmbeddingConfig;
use crate::embedding::vocab::Vocabulary;

/// Trained Word2Vec model.
///
/// Holds both weight matrices flat in row-major order: `input` is the
/// embedding proper (one row per vocabulary index), `output` is the
/// context matrix kept so that training can resume from a loaded model.
/// All lookups read the input matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEmbedding {
    pub(crate) vocab: Vocabulary,
    pub(crate) dimension: usize,
    pub(crate) input: Vec<f32>,
    pub(crate) output: Vec<f32>,
}

impl WordEmbedding {
    /// Fresh untrained matrices: input rows drawn uniformly from
    /// `±0.5 / dimension`, output rows all zero.
    pub(crate) fn init<R: Rng>(vocab: Vocabulary, dimension: usize, rng: &mut R) -> Self {
        let rows = vocab.len();
        let input = (0..rows * dimension)
            .map(|_| (rng.gen::<f32>() - 0.5) / dimension as f32)
            .collect();
        Self {
            vocab,
            dimension,
            input,
            output: vec![0.0; rows * dimension],
        }
    }

    /// Trains a model over index-encoded sentences. See
    /// [`train`](crate::embedding::train) for the procedure.
    pub fn train(vocab: Vocabulary, sentences: &[Vec<usize>], config: &EmbeddingConfig) -> Self {
        train::run(vocab, sentences, config)
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of embedded words.
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// Embedding row at a vocabulary index known to be in range.
    #[inline]
    pub(crate) fn row(&self, index: usize) -> &[f32] {
        &self.input[index * self.dimension..(index + 1) * self.dimension]
    }

    /// Embedding vector of `word`, `None` when out of vocabulary.
    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        self.vocab.index_of(word).map(|i| self.row(i))
    }

    /// Cosine similarity between two in-vocabulary words.
    pub fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        Some(cosine(self.vector(a)?, self.vector(b)?))
    }

    /// The `n` words closest to `word`, best first, excluding the word
    /// itself. `None` when `word` is out of vocabulary.
    pub fn nearest(&self, word: &str, n: usize) -> Option<Vec<(String, f32)>> {
        let index = self.vocab.index_of(word)?;
        Some(self.resolve(self.nearest_by_index(index, n)))
    }

    /// Index-level neighbor lookup used by the generation loop.
    pub(crate) fn nearest_by_index(&self, index: usize, n: usize) -> Vec<(usize, f32)> {
        self.nearest_to_vector(self.row(index), n, &[index])
    }

    /// The `n` rows most similar to an arbitrary query vector, excluding
    /// the listed indices. Returns nothing when the query length does not
    /// match the embedding dimension.
    pub fn nearest_to_vector(
        &self,
        query: &[f32],
        n: usize,
        exclude: &[usize],
    ) -> Vec<(usize, f32)> {
        if query.len() != self.dimension || self.dimension == 0 {
            return Vec::new();
        }
        let mut scores: Vec<(usize, f32)> = self
            .input
            .par_chunks_exact(self.dimension)
            .enumerate()
            .filter(|(i, _)| !exclude.contains(i))
            .map(|(i, row)| (i, cosine(query, row)))
            .collect();
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        scores.truncate(n);
        scores
    }

    /// Classic analogy lookup: returns the words closest to
    /// `b - a + c`, excluding all three inputs. `None` when any input is
    /// out of vocabulary.
    pub fn analogy(&self, a: &str, b: &str, c: &str, n: usize) -> Option<Vec<(String, f32)>> {
        let ia = self.vocab.index_of(a)?;
        let ib = self.vocab.index_of(b)?;
        let ic = self.vocab.index_of(c)?;
        let query: Vec<f32> = (0..self.dimension)
            .map(|d| self.row(ib)[d] - self.row(ia)[d] + self.row(ic)[d])
            .collect();
        Some(self.resolve(self.nearest_to_vector(&query, n, &[ia, ib, ic])))
    }

    fn resolve(&self, hits: Vec<(usize, f32)>) -> Vec<(String, f32)> {
        hits.into_iter()
            .filter_map(|(i, score)| self.vocab.word(i).map(|w| (w.to_string(), score)))
            .collect()
    }
}

/// cosθ = A·B / (|A||B|). Zero vectors score zero instead of NaN.
pub(crate) fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt() + f32::EPSILON)
}
