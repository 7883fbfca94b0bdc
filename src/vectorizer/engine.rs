use indexmap::IndexSet;
use num::Float;

use crate::{Corpus, TermFrequency};

/// Weighting scheme plugged into [`TfIdfVectorizer`](crate::TfIdfVectorizer).
///
/// `dims` is the ordered vocabulary: position in the set is the dimension
/// index, so both rows come back in vocabulary order. Implementations must
/// return exactly `dims.len()` weights.
pub trait TfIdfEngine<N>
where
    N: Float,
{
    /// Inverse document frequency for every dimension.
    fn idf_row(corpus: &Corpus, dims: &IndexSet<String>) -> Vec<N>;

    /// Term frequency of one document for every dimension.
    fn tf_row(freq: &TermFrequency, dims: &IndexSet<String>) -> Vec<N>;
}

/// Smoothed TF-IDF weighting.
///
/// idf is `ln((1 + n) / (1 + df)) + 1`, which keeps terms present in every
/// document at a small positive weight instead of zeroing them out. tf is
/// the occurrence count divided by document length.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTfIdfEngine;

impl DefaultTfIdfEngine {
    pub fn new() -> Self {
        DefaultTfIdfEngine
    }
}

impl<N> TfIdfEngine<N> for DefaultTfIdfEngine
where
    N: Float,
{
    fn idf_row(corpus: &Corpus, dims: &IndexSet<String>) -> Vec<N> {
        let doc_num = corpus.doc_count() as f64;
        dims.iter()
            .map(|term| {
                let doc_freq = corpus.doc_frequency(term) as f64;
                let idf = ((1.0 + doc_num) / (1.0 + doc_freq)).ln() + 1.0;
                N::from(idf).unwrap_or_else(N::zero)
            })
            .collect()
    }

    fn tf_row(freq: &TermFrequency, dims: &IndexSet<String>) -> Vec<N> {
        let total = freq.total() as f64;
        if total == 0.0 {
            return vec![N::zero(); dims.len()];
        }
        dims.iter()
            .map(|term| {
                let count = freq.count(term) as f64;
                N::from(count / total).unwrap_or_else(N::zero)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(terms: &[&str]) -> IndexSet<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn idf_is_lowest_for_terms_in_every_document() {
        let corpus = Corpus::new();
        corpus.add_document(&TermFrequency::from(&["gato", "casa"][..]));
        corpus.add_document(&TermFrequency::from(&["gato", "rua"][..]));
        let dims = dims(&["gato", "casa"]);
        let idf: Vec<f64> = DefaultTfIdfEngine::idf_row(&corpus, &dims);

        // n = 2: df("gato") = 2, df("casa") = 1.
        let expected_gato = (3.0f64 / 3.0).ln() + 1.0;
        let expected_casa = (3.0f64 / 2.0).ln() + 1.0;
        assert!((idf[0] - expected_gato).abs() < 1e-12);
        assert!((idf[1] - expected_casa).abs() < 1e-12);
        assert!(idf[0] < idf[1]);
    }

    #[test]
    fn idf_stays_positive_for_unseen_terms() {
        let corpus = Corpus::new();
        corpus.add_document(&TermFrequency::from(&["sol"][..]));
        let dims = dims(&["sol", "lua"]);
        let idf: Vec<f32> = DefaultTfIdfEngine::idf_row(&corpus, &dims);
        assert!(idf[1] > idf[0]);
        assert!(idf[0] > 0.0);
    }

    #[test]
    fn tf_row_divides_by_document_length() {
        let freq = TermFrequency::from(&["mar", "mar", "sal", "peixe"][..]);
        let dims = dims(&["mar", "sal", "barco"]);
        let tf: Vec<f32> = DefaultTfIdfEngine::tf_row(&freq, &dims);
        assert!((tf[0] - 0.5).abs() < 1e-6);
        assert!((tf[1] - 0.25).abs() < 1e-6);
        assert_eq!(tf[2], 0.0);
    }

    #[test]
    fn tf_row_of_empty_document_is_all_zero() {
        let freq = TermFrequency::new();
        let dims = dims(&["a", "b"]);
        let tf: Vec<f32> = DefaultTfIdfEngine::tf_row(&freq, &dims);
        assert_eq!(tf, vec![0.0, 0.0]);
    }
}
