use thiserror::Error;

/// Errors produced by model construction, training and persistence.
///
/// Engine modules stay panic-free on user input; anything that can fail
/// surfaces here instead.
#[derive(Debug, Error)]
pub enum ModelError {
    /// `transform()` or `similar_documents()` was called before `fit_documents()`.
    #[error("vocabulary is empty, call fit_documents() first")]
    VectorizerNotFitted,

    /// A generation or neighbor lookup was requested before `train_embedding()`.
    #[error("no trained embedding, call train_embedding() first")]
    EmbeddingNotTrained,

    /// A correction was requested before any dictionary was loaded.
    #[error("no dictionary loaded, call load_dictionary() first")]
    SpellerNotLoaded,

    /// The word is not part of the trained embedding vocabulary.
    #[error("word {0:?} is not in the vocabulary")]
    UnknownWord(String),

    /// Fit or training input contained no usable documents.
    #[error("input corpus is empty")]
    EmptyCorpus,

    /// Training produced fewer distinct words than the task needs.
    #[error("vocabulary too small: found {found} words, need at least {need}")]
    VocabularyTooSmall { found: usize, need: usize },

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] serde_cbor::Error),
}
