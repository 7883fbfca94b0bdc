use std::collections::HashMap;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

/// Raw term counts for one document.
///
/// This is the unit the vectorizer ingests: callers tokenize text however
/// they like, pour the tokens in here, and hand the result to
/// [`TfIdfVectorizer::add_doc`](crate::TfIdfVectorizer::add_doc).
///
/// # Examples
/// ```
/// use palavra::TermFrequency;
///
/// let mut freq = TermFrequency::new();
/// freq.add_terms(&["gato", "gato", "casa"]);
/// assert_eq!(freq.count("gato"), 2);
/// assert_eq!(freq.total(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFrequency {
    term_count: HashMap<String, u64, RandomState>,
    total_count: u64,
}

impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            term_count: HashMap::with_hasher(RandomState::new()),
            total_count: 0,
        }
    }

    /// Add one occurrence of `term`.
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        let count = self.term_count.entry(term.to_string()).or_insert(0);
        *count += 1;
        self.total_count += 1;
        self
    }

    /// Add one occurrence of every term in the slice.
    ///
    /// # Arguments
    /// * `terms` - slice of anything string-like
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Fold another frequency table into this one.
    pub fn merge(&mut self, other: &TermFrequency) -> &mut Self {
        for (term, count) in other.iter() {
            *self.term_count.entry(term.to_string()).or_insert(0) += count;
        }
        self.total_count += other.total_count;
        self
    }

    /// Occurrences of `term`, zero when absent.
    #[inline]
    pub fn count(&self, term: &str) -> u64 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Sum of all occurrences.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total_count
    }

    /// Number of distinct terms.
    #[inline]
    pub fn unique_len(&self) -> usize {
        self.term_count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    /// Count of the single most frequent term, zero for an empty table.
    pub fn most_frequent_count(&self) -> u64 {
        self.term_count.values().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_count.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// The distinct terms, in no particular order.
    pub fn term_set(&self) -> Vec<&str> {
        self.term_count.keys().map(String::as_str).collect()
    }
}

impl<S: AsRef<str>> From<&[S]> for TermFrequency {
    fn from(terms: &[S]) -> Self {
        let mut freq = TermFrequency::new();
        freq.add_terms(terms);
        freq
    }
}

impl<S: AsRef<str>> FromIterator<S> for TermFrequency {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut freq = TermFrequency::new();
        for term in iter {
            freq.add_term(term.as_ref());
        }
        freq
    }
}
