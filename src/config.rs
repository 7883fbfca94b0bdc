use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::tokenize::Tokenizer;
use crate::vectorizer::scoring::SimilarityAlgorithm;

/// Settings for the whole model. One tokenizer is shared by every engine so
/// the vectorizer, the embedding trainer and the dictionary builder all see
/// the same token stream.
///
/// The defaults are tuned for small Portuguese corpora; override fields
/// you care about and leave the rest alone:
///
/// ```
/// use palavra::{EmbeddingConfig, ModelConfig};
///
/// let config = ModelConfig {
///     embedding: EmbeddingConfig {
///         dimension: 50,
///         epochs: 20,
///         seed: Some(7),
///         ..EmbeddingConfig::default()
///     },
///     ..ModelConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub tokenizer: Tokenizer,
    pub vectorizer: VectorizerConfig,
    pub embedding: EmbeddingConfig,
    pub speller: SpellerConfig,
    pub generator: GeneratorConfig,
}

impl ModelConfig {
    /// Checks every section. Called by
    /// [`TextModel::new`](crate::TextModel::new).
    pub fn validate(&self) -> Result<(), ModelError> {
        self.embedding.validate()?;
        self.speller.validate()?;
        self.generator.validate()?;
        Ok(())
    }
}

/// Settings for the TF-IDF document index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub similarity: SimilarityAlgorithm,
}

/// Settings for Word2Vec training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding vector width.
    pub dimension: usize,
    /// Maximum context window radius. The effective radius is drawn
    /// uniformly from `1..=window` per center word.
    pub window: usize,
    /// Words seen fewer times than this are dropped from the vocabulary.
    pub min_count: u64,
    /// Passes over the training sentences.
    pub epochs: usize,
    /// Starting learning rate. Decays linearly over training.
    pub learning_rate: f32,
    /// Negative samples drawn per positive pair.
    pub negative_samples: usize,
    /// Train CBOW instead of skip-gram.
    pub cbow: bool,
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 100,
            window: 5,
            min_count: 2,
            epochs: 5,
            learning_rate: 0.025,
            negative_samples: 5,
            cbow: false,
            seed: None,
        }
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.dimension == 0 {
            return Err(ModelError::InvalidConfig(
                "embedding dimension must be at least 1".to_string(),
            ));
        }
        if self.window == 0 {
            return Err(ModelError::InvalidConfig(
                "context window must be at least 1".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(ModelError::InvalidConfig(
                "epochs must be at least 1".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Settings for the spelling corrector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellerConfig {
    /// Maximum edit distance a suggestion may sit from the input.
    pub max_edit_distance: usize,
}

impl Default for SpellerConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: 2,
        }
    }
}

impl SpellerConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.max_edit_distance == 0 {
            return Err(ModelError::InvalidConfig(
                "max edit distance must be at least 1".to_string(),
            ));
        }
        // The delete-variant index grows combinatorially with the distance.
        if self.max_edit_distance > 3 {
            return Err(ModelError::InvalidConfig(format!(
                "max edit distance must be at most 3, got {}",
                self.max_edit_distance
            )));
        }
        Ok(())
    }
}

/// Settings for weighted-random text generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// How many nearest neighbors feed the sampling pool per step.
    pub neighbors: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { neighbors: 10 }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.neighbors == 0 {
            return Err(ModelError::InvalidConfig(
                "neighbor pool must hold at least 1 word".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ModelConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let config = EmbeddingConfig {
            dimension: 0,
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ModelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn non_finite_learning_rate_is_rejected() {
        for lr in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            let config = EmbeddingConfig {
                learning_rate: lr,
                ..EmbeddingConfig::default()
            };
            assert!(config.validate().is_err(), "lr {lr} must be rejected");
        }
    }

    #[test]
    fn oversized_edit_distance_is_rejected() {
        let config = SpellerConfig {
            max_edit_distance: 4,
        };
        assert!(config.validate().is_err());
        let config = SpellerConfig {
            max_edit_distance: 3,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_neighbors_is_rejected() {
        let config = GeneratorConfig { neighbors: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_checks_every_section() {
        let config = ModelConfig {
            speller: SpellerConfig {
                max_edit_distance: 0,
            },
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
