use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use indexmap::{IndexMap, IndexSet};
use num::Float;

use crate::vectorizer::{
    corpus::Corpus,
    engine::TfIdfEngine,
    IdfVector, TfIdfVectorizer, TfVector,
};

/// Owned snapshot of a [`TfIdfVectorizer`] for deserialization.
///
/// The live vectorizer holds an `Arc<Corpus>` and is serialized without it;
/// this struct carries everything else and is turned back into a vectorizer
/// with [`into_vectorizer`](Self::into_vectorizer) once the caller supplies
/// a corpus reference again.
#[derive(Debug, Deserialize)]
pub struct TfIdfData<N = f32, K = String>
where
    N: Float,
    K: Eq + Hash,
{
    pub documents: IndexMap<K, TfVector<N>>,
    pub dims: IndexSet<String>,
    pub idf: IdfVector<N>,
}

impl<N, K> TfIdfData<N, K>
where
    N: Float + Send + Sync,
    K: Clone + Eq + Hash + Send + Sync,
{
    /// Rebuilds the live vectorizer around `corpus_ref`.
    ///
    /// The stored idf row is kept when the corpus generation still matches,
    /// recomputed otherwise.
    pub fn into_vectorizer<E>(self, corpus_ref: Arc<Corpus>) -> TfIdfVectorizer<N, K, E>
    where
        E: TfIdfEngine<N> + Send + Sync,
    {
        let mut instance = TfIdfVectorizer {
            documents: self.documents,
            dims: self.dims,
            corpus_ref,
            idf_cache: self.idf,
            _marker: PhantomData,
        };
        instance.update_idf();
        instance
    }
}

impl<N, K, E> Serialize for TfIdfVectorizer<N, K, E>
where
    N: Float + Send + Sync + Serialize,
    K: Clone + Eq + Hash + Send + Sync + Serialize,
    E: TfIdfEngine<N> + Send + Sync,
{
    /// Serializes everything except the corpus reference. Deserialize into
    /// [`TfIdfData`] and call `into_vectorizer` to restore.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TfIdfVectorizer", 3)?;
        state.serialize_field("documents", &self.documents)?;
        state.serialize_field("dims", &self.dims)?;
        state.serialize_field("idf", &self.idf_cache)?;
        state.end()
    }
}
