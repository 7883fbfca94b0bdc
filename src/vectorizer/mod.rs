pub mod corpus;
pub mod engine;
pub mod scoring;
pub mod serde;
pub mod term;

use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use ::serde::{Deserialize, Serialize};
use indexmap::{IndexMap, IndexSet};
use num::Float;

use crate::vectorizer::{
    corpus::Corpus,
    engine::{DefaultTfIdfEngine, TfIdfEngine},
    term::TermFrequency,
};

/// TF-IDF document index.
///
/// Stores one tf row per document and a shared [`Corpus`] holding document
/// frequencies. The idf vector is cached and recomputed lazily whenever the
/// corpus generation moves, so several vectorizers can share one corpus
/// without stepping on each other.
///
/// Dimensions are assigned to terms in first-seen order and never move.
/// A vector produced by [`transform`](Self::transform) therefore stays
/// comparable across the life of the index.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer<N = f32, K = String, E = DefaultTfIdfEngine>
where
    N: Float + Send + Sync,
    K: Clone + Eq + Hash + Send + Sync,
    E: TfIdfEngine<N> + Send + Sync,
{
    /// Per-document tf rows, keyed by caller-chosen document id.
    pub(crate) documents: IndexMap<K, TfVector<N>>,
    /// Ordered vocabulary. Position in the set is the dimension index.
    pub(crate) dims: IndexSet<String>,
    /// Shared document-frequency store.
    pub(crate) corpus_ref: Arc<Corpus>,
    /// Cached idf row, refreshed when the corpus generation moves.
    pub(crate) idf_cache: IdfVector<N>,
    pub(crate) _marker: PhantomData<E>,
}

/// One document's term-frequency row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfVector<N>
where
    N: Float,
{
    /// tf weight per dimension. May be shorter than the current
    /// vocabulary if the vocabulary grew after this row was stored;
    /// missing tail dimensions read as zero.
    pub(crate) weights: Vec<N>,
    /// Token count of the document the row was built from.
    pub(crate) term_total: u64,
}

impl<N> TfVector<N>
where
    N: Float,
{
    /// Weight at dimension `i`, zero past the stored tail.
    #[inline]
    pub fn weight(&self, i: usize) -> N {
        self.weights.get(i).copied().unwrap_or_else(N::zero)
    }

    pub fn term_total(&self) -> u64 {
        self.term_total
    }
}

/// Cached idf row plus the corpus generation it was computed at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdfVector<N>
where
    N: Float,
{
    pub(crate) values: Vec<N>,
    pub(crate) generation: u64,
    pub(crate) doc_num: u64,
}

impl<N> IdfVector<N>
where
    N: Float,
{
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            generation: 0,
            doc_num: 0,
        }
    }
}

impl<N> Default for IdfVector<N>
where
    N: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, K, E> TfIdfVectorizer<N, K, E>
where
    N: Float + Send + Sync,
    K: Clone + Eq + Hash + Send + Sync,
    E: TfIdfEngine<N> + Send + Sync,
{
    pub fn new(corpus_ref: Arc<Corpus>) -> Self {
        let mut instance = Self {
            documents: IndexMap::new(),
            dims: IndexSet::new(),
            corpus_ref,
            idf_cache: IdfVector::new(),
            _marker: PhantomData,
        };
        instance.re_calc_idf();
        instance
    }

    /// Swaps the corpus reference and recomputes idf against it.
    pub fn set_corpus_ref(&mut self, corpus_ref: Arc<Corpus>) {
        self.corpus_ref = corpus_ref;
        self.re_calc_idf();
    }

    pub fn corpus_ref(&self) -> &Arc<Corpus> {
        &self.corpus_ref
    }

    /// Recomputes the idf cache if the corpus changed since the last
    /// computation. Cheap no-op otherwise.
    pub fn update_idf(&mut self) {
        if self.corpus_ref.generation() != self.idf_cache.generation {
            self.re_calc_idf();
        }
    }

    fn re_calc_idf(&mut self) {
        self.idf_cache.generation = self.corpus_ref.generation();
        self.idf_cache.doc_num = self.corpus_ref.doc_count();
        self.idf_cache.values = E::idf_row(&self.corpus_ref, &self.dims);
    }

    /// Cached idf weight at dimension `i` as f64, zero past the tail.
    #[inline]
    pub(crate) fn idf_weight(&self, i: usize) -> f64 {
        self.idf_cache
            .values
            .get(i)
            .copied()
            .unwrap_or_else(N::zero)
            .to_f64()
            .unwrap_or(0.0)
    }

    /// Indexes a document under `key`. Re-adding an existing key replaces
    /// the previous row. The shared corpus is updated immediately.
    pub fn add_doc(&mut self, key: K, doc: &TermFrequency) {
        if self.documents.contains_key(&key) {
            self.remove_doc(&key);
        }
        self.corpus_ref.add_document(doc);
        // New vocabulary is appended, never reordered.
        for term in doc.term_set() {
            self.dims.insert(term.to_string());
        }
        let mut weights = E::tf_row(doc, &self.dims);
        weights.shrink_to_fit();
        self.documents.insert(
            key,
            TfVector {
                weights,
                term_total: doc.total(),
            },
        );
    }

    /// Removes a document and rolls its terms out of the shared corpus.
    /// Dimensions stay allocated; rows never shift.
    pub fn remove_doc(&mut self, key: &K) {
        if let Some(doc) = self.documents.get(key) {
            let mut freq = TermFrequency::new();
            for (i, term) in self.dims.iter().enumerate() {
                if doc.weight(i) > N::zero() {
                    freq.add_term(term);
                }
            }
            self.documents.shift_remove(key);
            self.corpus_ref.remove_document(&freq);
        }
    }

    /// TF-IDF vector of one query or document frequency, L2-normalized.
    /// Refreshes the idf cache first.
    ///
    /// The result always has exactly [`dim_len`](Self::dim_len) entries, in
    /// vocabulary order. Terms outside the vocabulary contribute nothing.
    pub fn transform(&mut self, freq: &TermFrequency) -> Vec<N> {
        self.update_idf();
        self.transform_uncheck_idf(freq)
    }

    /// Same as [`transform`](Self::transform) against the idf cache as it
    /// currently stands.
    pub fn transform_uncheck_idf(&self, freq: &TermFrequency) -> Vec<N> {
        let tf: Vec<N> = E::tf_row(freq, &self.dims);
        let mut row: Vec<f64> = tf
            .iter()
            .enumerate()
            .map(|(i, v)| v.to_f64().unwrap_or(0.0) * self.idf_weight(i))
            .collect();
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut row {
                *v /= norm;
            }
        }
        row.into_iter()
            .map(|v| N::from(v).unwrap_or_else(N::zero))
            .collect()
    }

    pub fn get_tf(&self, key: &K) -> Option<&TfVector<N>> {
        self.documents.get(key)
    }

    pub fn contains_doc(&self, key: &K) -> bool {
        self.documents.contains_key(key)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.dims.contains(term)
    }

    /// Number of indexed documents.
    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    /// Number of vocabulary dimensions.
    pub fn dim_len(&self) -> usize {
        self.dims.len()
    }

    /// Document keys in insertion order.
    pub fn doc_keys(&self) -> impl Iterator<Item = &K> {
        self.documents.keys()
    }

    /// Vocabulary terms in dimension order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.dims.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::scoring::SimilarityAlgorithm;
    use super::*;

    fn vectorizer() -> TfIdfVectorizer<f32, usize> {
        TfIdfVectorizer::new(Arc::new(Corpus::new()))
    }

    fn freq(terms: &[&str]) -> TermFrequency {
        TermFrequency::from(terms)
    }

    #[test]
    fn add_doc_grows_dims_in_first_seen_order() {
        let mut v = vectorizer();
        v.add_doc(0, &freq(&["gato", "casa"]));
        v.add_doc(1, &freq(&["casa", "rua"]));
        assert_eq!(v.doc_num(), 2);
        assert_eq!(v.dim_len(), 3);
        assert!(v.contains_term("rua"));
        // "rua" arrived last so it owns the last dimension.
        assert_eq!(v.terms().last(), Some("rua"));
    }

    #[test]
    fn transform_is_l2_normalized_and_dim_ordered() {
        let mut v = vectorizer();
        v.add_doc(0, &freq(&["gato", "gato", "casa"]));
        v.add_doc(1, &freq(&["rua"]));
        let row = v.transform(&freq(&["gato", "rua"]));
        assert_eq!(row.len(), v.dim_len());
        let norm: f32 = row.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn transform_of_unknown_terms_is_all_zero() {
        let mut v = vectorizer();
        v.add_doc(0, &freq(&["sol"]));
        let row = v.transform(&freq(&["lua", "estrela"]));
        assert!(row.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn remove_doc_rolls_back_the_corpus() {
        let mut v = vectorizer();
        let doc = freq(&["mar", "sal"]);
        v.add_doc(0, &doc);
        v.add_doc(1, &freq(&["mar"]));
        v.remove_doc(&0);
        assert_eq!(v.doc_num(), 1);
        assert_eq!(v.corpus_ref().doc_count(), 1);
        assert_eq!(v.corpus_ref().doc_frequency("sal"), 0);
        assert_eq!(v.corpus_ref().doc_frequency("mar"), 1);
        // Dimensions are never reclaimed.
        assert!(v.contains_term("sal"));
    }

    #[test]
    fn re_adding_a_key_replaces_the_document() {
        let mut v = vectorizer();
        v.add_doc(7, &freq(&["velho"]));
        v.add_doc(7, &freq(&["novo"]));
        assert_eq!(v.doc_num(), 1);
        assert_eq!(v.corpus_ref().doc_count(), 1);
        assert_eq!(v.corpus_ref().doc_frequency("velho"), 0);
        assert_eq!(v.corpus_ref().doc_frequency("novo"), 1);
    }

    #[test]
    fn similarity_ranks_the_matching_document_first() {
        let mut v = vectorizer();
        v.add_doc(0, &freq(&["gato", "dorme", "sofá"]));
        v.add_doc(1, &freq(&["carro", "anda", "rua"]));
        v.add_doc(2, &freq(&["gato", "come", "peixe"]));
        let mut hits = v.similarity(&freq(&["gato", "dorme"]), &SimilarityAlgorithm::Cosine);
        hits.sort_by_score();
        assert_eq!(hits.list[0].0, 0);
        assert!(hits.list[0].1 > hits.list[1].1);
    }

    #[test]
    fn unknown_only_query_scores_no_documents() {
        let mut v = vectorizer();
        v.add_doc(0, &freq(&["gato", "casa"]));
        v.add_doc(1, &freq(&["rua", "carro"]));
        for algorithm in [SimilarityAlgorithm::Cosine, SimilarityAlgorithm::Dot] {
            let hits = v.similarity(&freq(&["xyzzy", "qwerty"]), &algorithm);
            assert!(hits.is_empty(), "{algorithm:?} scored an unknown-only query");
        }
        // One known term is enough to score again.
        let hits = v.similarity(&freq(&["xyzzy", "gato"]), &SimilarityAlgorithm::Cosine);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn idf_cache_follows_corpus_changes() {
        let corpus = Arc::new(Corpus::new());
        let mut a: TfIdfVectorizer<f32, usize> = TfIdfVectorizer::new(Arc::clone(&corpus));
        let mut b: TfIdfVectorizer<f32, usize> = TfIdfVectorizer::new(Arc::clone(&corpus));
        a.add_doc(0, &freq(&["gato"]));
        b.add_doc(0, &freq(&["gato", "cão"]));
        // Both saw the other's corpus updates after refresh.
        a.update_idf();
        b.update_idf();
        assert_eq!(a.idf_cache.generation, corpus.generation());
        assert_eq!(b.idf_cache.generation, corpus.generation());
        assert_eq!(a.idf_cache.doc_num, 2);
    }
}
