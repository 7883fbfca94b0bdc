use std::fmt::Debug;

use num::Float;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    vectorizer::{engine::TfIdfEngine, TfIdfVectorizer},
    TermFrequency,
};

/// Similarity measure used when ranking documents against a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimilarityAlgorithm {
    /// Dot product. Considers both direction and magnitude.
    Dot,
    /// Cosine similarity. Considers only direction.
    Cosine,
}

impl Default for SimilarityAlgorithm {
    fn default() -> Self {
        SimilarityAlgorithm::Cosine
    }
}

/// Ranked scoring results.
pub struct Hits<K> {
    /// (document key, score)
    pub list: Vec<(K, f64)>,
}

impl<K> Hits<K> {
    pub fn new(list: Vec<(K, f64)>) -> Self {
        Hits { list }
    }

    /// Sort by descending score. NaN scores are dropped first.
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.retain(|(_, s)| !s.is_nan());
        self.list.sort_by(|a, b| b.1.total_cmp(&a.1));
        self
    }

    /// Sort by ascending score. NaN scores are dropped first.
    pub fn sort_by_score_rev(&mut self) -> &mut Self {
        self.list.retain(|(_, s)| !s.is_nan());
        self.list.sort_by(|a, b| a.1.total_cmp(&b.1));
        self
    }

    /// Keep only the first `n` entries.
    pub fn truncate(&mut self, n: usize) -> &mut Self {
        self.list.truncate(n);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, f64)> {
        self.list.iter()
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for (key, score) in &self.list {
                writeln!(f, "    {:?}: {:.6}", key, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl<N, K, E> TfIdfVectorizer<N, K, E>
where
    N: Float + Send + Sync,
    K: Clone + Eq + std::hash::Hash + Send + Sync,
    E: TfIdfEngine<N> + Send + Sync,
{
    /// Scores every indexed document against the query frequency.
    /// Refreshes the idf cache before scoring.
    pub fn similarity(&mut self, freq: &TermFrequency, algorithm: &SimilarityAlgorithm) -> Hits<K> {
        self.update_idf();
        self.similarity_uncheck_idf(freq, algorithm)
    }

    /// Scores against the idf cache as it currently stands. Call
    /// [`update_idf`](Self::update_idf) first if the corpus may have moved.
    pub fn similarity_uncheck_idf(
        &self,
        freq: &TermFrequency,
        algorithm: &SimilarityAlgorithm,
    ) -> Hits<K> {
        // A query with no vocabulary term maps to the zero vector and is
        // similar to nothing, not equally similar to everything.
        if !freq.iter().any(|(term, _)| self.dims.contains(term)) {
            return Hits { list: Vec::new() };
        }
        let list = match algorithm {
            SimilarityAlgorithm::Dot => self.scoring_dot(freq),
            SimilarityAlgorithm::Cosine => self.scoring_cosine(freq),
        };
        Hits { list }
    }

    fn scoring_dot(&self, freq: &TermFrequency) -> Vec<(K, f64)> {
        let query_tf: Vec<N> = E::tf_row(freq, &self.dims);
        self.documents
            .par_iter()
            .map(|(key, doc)| {
                let score = query_tf
                    .iter()
                    .enumerate()
                    .map(|(i, qv)| {
                        let idf = self.idf_weight(i);
                        let dv = doc.weight(i).to_f64().unwrap_or(0.0);
                        let qv = qv.to_f64().unwrap_or(0.0);
                        qv * dv * (idf * idf)
                    })
                    .sum::<f64>();
                (key.clone(), score)
            })
            .collect()
    }

    /// cosθ = A·B / (|A||B|), over idf-weighted tf rows.
    fn scoring_cosine(&self, freq: &TermFrequency) -> Vec<(K, f64)> {
        let query_tf: Vec<N> = E::tf_row(freq, &self.dims);
        self.documents
            .par_iter()
            .map(|(key, doc)| {
                let mut dot = 0_f64;
                let mut norm_q = 0_f64;
                let mut norm_d = 0_f64;
                for i in 0..self.dims.len() {
                    let idf = self.idf_weight(i);
                    let qv = query_tf.get(i).copied().unwrap_or_else(N::zero).to_f64().unwrap_or(0.0) * idf;
                    let dv = doc.weight(i).to_f64().unwrap_or(0.0) * idf;
                    dot += qv * dv;
                    norm_q += qv * qv;
                    norm_d += dv * dv;
                }
                // Zero division safety with f64::EPSILON.
                let score = dot / (norm_q.sqrt() * norm_d.sqrt() + f64::EPSILON);
                (key.clone(), score)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_by_score_drops_nan_and_orders_descending() {
        let mut hits = Hits::new(vec![
            ("a", 0.2),
            ("b", f64::NAN),
            ("c", 0.9),
            ("d", 0.5),
        ]);
        hits.sort_by_score();
        let keys: Vec<&str> = hits.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["c", "d", "a"]);
    }

    #[test]
    fn sort_by_score_rev_orders_ascending() {
        let mut hits = Hits::new(vec![("a", 0.9), ("b", 0.1)]);
        hits.sort_by_score_rev();
        assert_eq!(hits.list[0].0, "b");
    }

    #[test]
    fn truncate_keeps_the_head() {
        let mut hits = Hits::new(vec![("a", 3.0), ("b", 2.0), ("c", 1.0)]);
        hits.sort_by_score().truncate(2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.list[1].0, "b");
    }
}
