use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::config::GeneratorConfig;
use crate::embedding::WordEmbedding;
use crate::error::ModelError;

/// Random-walk text generation over a trained embedding.
///
/// Each step looks up the current word's nearest neighbors and samples the
/// next word with probability proportional to similarity, so the walk
/// prefers close words without being glued to the single closest one.
pub struct TextGenerator<'a> {
    embedding: &'a WordEmbedding,
    config: &'a GeneratorConfig,
}

impl<'a> TextGenerator<'a> {
    pub fn new(embedding: &'a WordEmbedding, config: &'a GeneratorConfig) -> Self {
        Self { embedding, config }
    }

    /// Walks `len` steps from `seed` and returns the space-joined path,
    /// seed included. A `len` of zero returns the seed alone.
    ///
    /// The seed must be in the embedding vocabulary. The walk ends early
    /// only when the vocabulary has no neighbor to offer at all.
    pub fn generate<R: Rng>(&self, seed: &str, len: usize, rng: &mut R) -> Result<String, ModelError> {
        let mut current = self
            .embedding
            .vocab()
            .index_of(seed)
            .ok_or_else(|| ModelError::UnknownWord(seed.to_string()))?;

        let mut words = Vec::with_capacity(len + 1);
        words.push(seed.to_string());
        for _ in 0..len {
            let neighbors = self.embedding.nearest_by_index(current, self.config.neighbors);
            if neighbors.is_empty() {
                debug!("walk stopped early, no neighbors for index {current}");
                break;
            }
            let next = sample_neighbor(&neighbors, rng);
            if let Some(word) = self.embedding.vocab().word(next) {
                words.push(word.to_string());
            }
            current = next;
        }
        Ok(words.join(" "))
    }
}

/// Similarity-weighted draw from the neighbor pool.
///
/// Negative and non-finite scores contribute no mass. When no neighbor has
/// mass left the draw falls back to uniform, so the walk never stalls on an
/// all-negative neighborhood.
fn sample_neighbor<R: Rng>(neighbors: &[(usize, f32)], rng: &mut R) -> usize {
    let weights: Vec<f64> = neighbors
        .iter()
        .map(|(_, score)| {
            let s = *score as f64;
            if s.is_finite() && s > 0.0 {
                s
            } else {
                0.0
            }
        })
        .collect();
    if weights.iter().sum::<f64>() > 0.0 {
        if let Ok(dist) = WeightedIndex::new(&weights) {
            return neighbors[dist.sample(rng)].0;
        }
    }
    neighbors[rng.gen_range(0..neighbors.len())].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::vocab::Vocabulary;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn embedding(words: &[&str]) -> WordEmbedding {
        let sentences = vec![words.to_vec()];
        let vocab = Vocabulary::build(&sentences, 1);
        let mut rng = StdRng::seed_from_u64(11);
        WordEmbedding::init(vocab, 8, &mut rng)
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig { neighbors: 3 }
    }

    #[test]
    fn generates_the_requested_number_of_words() {
        let emb = embedding(&["gato", "cão", "peixe", "casa", "rua", "sol"]);
        let cfg = config();
        let walker = TextGenerator::new(&emb, &cfg);
        let mut rng = StdRng::seed_from_u64(5);
        let text = walker.generate("gato", 7, &mut rng).unwrap();
        assert_eq!(text.split_whitespace().count(), 8);
        assert!(text.starts_with("gato"));
    }

    #[test]
    fn every_generated_word_is_in_the_vocabulary() {
        let emb = embedding(&["gato", "cão", "peixe", "casa", "rua", "sol"]);
        let cfg = config();
        let walker = TextGenerator::new(&emb, &cfg);
        let mut rng = StdRng::seed_from_u64(17);
        let text = walker.generate("casa", 12, &mut rng).unwrap();
        for word in text.split_whitespace() {
            assert!(emb.vocab().contains(word), "unknown word {word:?} generated");
        }
    }

    #[test]
    fn zero_length_returns_just_the_seed() {
        let emb = embedding(&["gato", "cão"]);
        let cfg = config();
        let walker = TextGenerator::new(&emb, &cfg);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(walker.generate("cão", 0, &mut rng).unwrap(), "cão");
    }

    #[test]
    fn unknown_seed_is_an_error() {
        let emb = embedding(&["gato", "cão"]);
        let cfg = config();
        let walker = TextGenerator::new(&emb, &cfg);
        let mut rng = StdRng::seed_from_u64(1);
        let err = walker.generate("dragão", 3, &mut rng).unwrap_err();
        assert!(matches!(err, ModelError::UnknownWord(w) if w == "dragão"));
    }

    #[test]
    fn same_rng_seed_walks_the_same_path() {
        let emb = embedding(&["gato", "cão", "peixe", "casa", "rua", "sol"]);
        let cfg = config();
        let walker = TextGenerator::new(&emb, &cfg);
        let a = walker.generate("sol", 10, &mut StdRng::seed_from_u64(33)).unwrap();
        let b = walker.generate("sol", 10, &mut StdRng::seed_from_u64(33)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_word_vocabulary_stops_at_the_seed() {
        let emb = embedding(&["gato"]);
        let cfg = config();
        let walker = TextGenerator::new(&emb, &cfg);
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(walker.generate("gato", 5, &mut rng).unwrap(), "gato");
    }

    #[test]
    fn sampling_ignores_non_positive_and_non_finite_scores() {
        let mut rng = StdRng::seed_from_u64(9);
        let pool = [(1, f32::NAN), (2, 1.0), (3, -0.4)];
        for _ in 0..32 {
            assert_eq!(sample_neighbor(&pool, &mut rng), 2);
        }
    }

    #[test]
    fn all_negative_scores_fall_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(4);
        let pool = [(3, -1.0), (7, -0.5)];
        for _ in 0..16 {
            let drawn = sample_neighbor(&pool, &mut rng);
            assert!(drawn == 3 || drawn == 7);
        }
    }
}
