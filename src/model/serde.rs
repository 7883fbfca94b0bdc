use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::ModelConfig;
use crate::embedding::WordEmbedding;
use crate::model::TextModel;
use crate::speller::SpellCorrector;
use crate::vectorizer::corpus::Corpus;
use crate::vectorizer::serde::TfIdfData;

/// Owned snapshot of a [`TextModel`], as written by
/// [`TextModel::save`](crate::TextModel::save).
///
/// A live model serializes straight into this shape, so loading is
/// deserialize-then-[`into_model`](Self::into_model) with no copies of the
/// engine state.
#[derive(Debug, Deserialize)]
pub struct TextModelData {
    pub config: ModelConfig,
    pub corpus: Corpus,
    pub vectorizer: Option<TfIdfData<f32, usize>>,
    pub embedding: Option<WordEmbedding>,
    pub speller: Option<SpellCorrector>,
}

impl TextModelData {
    /// Rebuilds the live model, rewiring the vectorizer to the restored
    /// corpus.
    pub fn into_model(self) -> TextModel {
        let corpus = Arc::new(self.corpus);
        TextModel {
            config: self.config,
            vectorizer: self
                .vectorizer
                .map(|data| data.into_vectorizer(Arc::clone(&corpus))),
            embedding: self.embedding,
            speller: self.speller,
            corpus,
        }
    }
}

/// Serializes the live model in the exact shape [`TextModelData`]
/// deserializes from. The corpus behind the `Arc` is written inline.
impl Serialize for TextModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TextModel", 5)?;
        state.serialize_field("config", &self.config)?;
        state.serialize_field("corpus", self.corpus.as_ref())?;
        state.serialize_field("vectorizer", &self.vectorizer)?;
        state.serialize_field("embedding", &self.embedding)?;
        state.serialize_field("speller", &self.speller)?;
        state.end()
    }
}
