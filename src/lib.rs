/// This crate is a text modeling toolkit for Portuguese corpora, combining a
/// TF-IDF vectorizer, Word2Vec embeddings and dictionary-based spelling
/// correction behind a single model interface.
pub mod config;
pub mod embedding;
pub mod error;
pub mod generator;
pub mod model;
pub mod speller;
pub mod tokenize;
pub mod vectorizer;

/// Text Model
/// The top-level struct of this crate, orchestrating three independent
/// engines behind one interface.
///
/// Internally, it holds:
/// - A shared tokenizer applied to every piece of input text
/// - A TF-IDF vectorizer over the fitted documents
/// - A Word2Vec embedding trained on sentences
/// - A symmetric-delete spelling corrector over a frequency dictionary
///
/// The engines are optional and independent: fit, train and load in any
/// order and any subset. Operations that need an engine that is not ready
/// return a typed error instead of panicking.
///
/// # Serialization
/// Supported. The whole model, configuration and corpus included, is
/// written as a single CBOR value via `save`/`save_to_writer`.
///
/// # Deserialization
/// Supported via `load`/`load_from_reader`, including rewiring the restored
/// vectorizer to the restored corpus.
pub use model::TextModel;

/// Text Model Data Structure for Serialization
/// The owned snapshot a saved model deserializes into. Convert it back into
/// a live [`TextModel`] with `into_model`.
pub use model::serde::TextModelData;

/// Model Configuration
/// Groups the knobs of every engine: the shared tokenizer, the similarity
/// algorithm for document search, the Word2Vec hyperparameters, the edit
/// distance budget of the corrector and the neighborhood size of the
/// generator. Validated once when the model is built.
pub use config::ModelConfig;

/// Per-engine configuration sections of [`ModelConfig`].
pub use config::{EmbeddingConfig, GeneratorConfig, SpellerConfig, VectorizerConfig};

/// Model Error
/// Every fallible operation of this crate returns this error type. Guard
/// variants name the engine that is missing; `Io` and `Codec` wrap the
/// underlying persistence failures.
pub use error::ModelError;

/// Tokenizer
/// Splits raw text into normalized word tokens. One tokenizer, configured
/// on the model, feeds all three engines so they agree on what a word is.
///
/// Normalization steps, each optional:
/// - Lowercasing
/// - Accent stripping
/// - Minimum token length (measured in characters)
/// - Stopword removal
pub use tokenize::{StopwordFilter, Tokenizer};

/// TF-IDF Vectorizer
/// Converts a document collection into TF-IDF vectors and scores queries
/// against them.
///
/// `TfIdfVectorizer<N, K, E>` has the following generic parameters:
/// - `N`: Vector parameter type (e.g., f32, f64)
/// - `K`: Document key type (e.g., String, usize)
/// - `E`: TF-IDF calculation engine type (e.g., DefaultTfIdfEngine)
///
/// When creating an instance, you must pass a corpus reference as
/// `Arc<Corpus>`. The `Corpus` can be shared among multiple vectorizers.
///
/// # Serialization
/// Supported. The `Corpus` reference is not included; use [`TfIdfData`] as
/// the storage shape and re-attach a corpus when unpacking.
pub use vectorizer::TfIdfVectorizer;

/// TF-IDF Vectorizer Data Structure for Serialization
/// A serializable snapshot that does not hold a `Corpus` reference (unlike
/// `TfIdfVectorizer`). You can convert it into `TfIdfVectorizer` by passing
/// an `Arc<Corpus>` via `into_vectorizer`.
pub use vectorizer::serde::TfIdfData;

/// Corpus for TF-IDF Vectorizer
/// This struct manages document-frequency statistics. It does not store
/// document text or IDs; it only manages:
/// - The number of documents
/// - The number of documents in which each term appears
///
/// It is used as the base data for IDF (Inverse Document Frequency)
/// calculation.
///
/// # Thread Safety
/// This struct is thread-safe and can be accessed concurrently from
/// multiple threads. Implemented using DashMap and atomics.
pub use vectorizer::corpus::Corpus;

/// Term Frequency structure
/// A struct for analyzing/managing term occurrence frequency within a
/// document. It manages:
/// - The count of occurrences of each term
/// - The total number of terms in the document
///
/// Used as base data for TF (Term Frequency) calculation.
pub use vectorizer::term::TermFrequency;

/// TF-IDF Calculation Engine Trait
/// A trait that defines the behavior of a TF-IDF calculation engine.
///
/// By implementing this trait, you can plug different weighting strategies
/// into `TfIdfVectorizer<E>`. The default implementation,
/// `DefaultTfIdfEngine`, uses smoothed idf so that terms present in every
/// document still carry a small positive weight.
pub use vectorizer::engine::{DefaultTfIdfEngine, TfIdfEngine};

/// Similarity Algorithm for TF-IDF Vectorizer
/// Defines the similarity-scoring algorithms used by document search.
///
/// Currently, the following algorithms are supported:
/// - Dot: dot product (favors long documents)
/// - Cosine Similarity: cosine similarity (length-invariant, the default)
pub use vectorizer::scoring::SimilarityAlgorithm;

/// Search Hits structure
/// Holds a list of scored document keys and provides sorting by score and
/// truncation to a result budget.
pub use vectorizer::scoring::Hits;

/// Word Embedding
/// Dense word vectors trained with skip-gram or CBOW and negative sampling.
/// Provides nearest-neighbor and analogy lookups over the trained space.
pub use embedding::WordEmbedding;

/// Embedding Vocabulary
/// The words the trainer kept, ordered by corpus frequency, with the
/// unigram counts negative sampling draws from.
pub use embedding::vocab::Vocabulary;

/// Text Generator
/// The similarity-weighted random walk over a trained embedding that backs
/// `TextModel::generate_text`.
pub use generator::TextGenerator;

/// Spelling Corrector
/// Symmetric-delete dictionary lookup: candidates are found through
/// precomputed delete variants and verified with optimal string alignment
/// distance, then ranked by distance and corpus frequency.
pub use speller::{SpellCorrector, Suggestion};
