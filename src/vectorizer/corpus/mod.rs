use std::sync::atomic::{AtomicU64, Ordering};

use ahash::RandomState;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::TermFrequency;

/// Document-frequency store shared by every vectorizer that indexes into it.
///
/// Tracks, for each term, how many documents contain it at least once.
/// Additions and removals bump separate counters so that readers can tell
/// both the live document count (`add - sub`) and whether anything changed
/// at all (`add + sub`, the generation). The idf cache uses the generation
/// to decide when it is stale.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Corpus {
    add_num: AtomicU64,
    sub_num: AtomicU64,
    doc_counts: DashMap<Box<str>, u64, RandomState>,
}

impl Clone for Corpus {
    fn clone(&self) -> Self {
        Self {
            add_num: AtomicU64::new(self.add_num.load(Ordering::Acquire)),
            sub_num: AtomicU64::new(self.sub_num.load(Ordering::Acquire)),
            doc_counts: self.doc_counts.clone(),
        }
    }
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            add_num: AtomicU64::new(0),
            sub_num: AtomicU64::new(0),
            doc_counts: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Registers one document. Each distinct term in `freq` gains one
    /// containing document, regardless of how often it occurs inside.
    pub fn add_document(&self, freq: &TermFrequency) {
        self.add_num.fetch_add(1, Ordering::Relaxed);
        for (term, _) in freq.iter() {
            self.doc_counts
                .entry(term.into())
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
    }

    /// Unregisters one document previously passed to `add_document`.
    /// Terms whose containing-document count drops to zero are removed.
    pub fn remove_document(&self, freq: &TermFrequency) {
        self.sub_num.fetch_add(1, Ordering::Relaxed);
        for (term, _) in freq.iter() {
            if let Some(mut count) = self.doc_counts.get_mut(term) {
                if *count > 1 {
                    *count -= 1;
                } else {
                    drop(count);
                    self.doc_counts.remove(term);
                }
            }
        }
    }

    /// Number of live documents.
    pub fn doc_count(&self) -> u64 {
        let add_num = self.add_num.load(Ordering::Relaxed);
        let sub_num = self.sub_num.load(Ordering::Relaxed);
        add_num - sub_num
    }

    /// Monotonic change counter. Any add or remove bumps it.
    pub fn generation(&self) -> u64 {
        let add_num = self.add_num.load(Ordering::Relaxed);
        let sub_num = self.sub_num.load(Ordering::Relaxed);
        add_num + sub_num
    }

    /// Number of documents containing `term`, zero when unseen.
    pub fn doc_frequency(&self, term: &str) -> u64 {
        self.doc_counts.get(term).map_or(0, |count| *count)
    }

    /// Number of distinct terms across all live documents.
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.doc_counts.len()
    }

    /// All distinct terms, in no particular order.
    pub fn terms(&self) -> Vec<String> {
        self.doc_counts
            .iter()
            .map(|entry| entry.key().to_string())
            .collect()
    }

    /// Folds another corpus into self, summing document frequencies.
    pub fn merge(&self, other: &Corpus) {
        for entry in other.doc_counts.iter() {
            let term = entry.key();
            let count_other = *entry.value();
            self.doc_counts
                .entry(term.clone())
                .and_modify(|count| *count += count_other)
                .or_insert(count_other);
        }
        self.add_num
            .fetch_add(other.add_num.load(Ordering::Relaxed), Ordering::Relaxed);
        self.sub_num
            .fetch_add(other.sub_num.load(Ordering::Relaxed), Ordering::Relaxed);
    }
}
