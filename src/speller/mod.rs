use std::collections::{HashMap, HashSet};

use ahash::RandomState;
use log::debug;
use serde::{Deserialize, Serialize};

/// One ranked correction candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub word: String,
    /// Edit distance from the input, transpositions counted as one edit.
    pub distance: usize,
    /// Corpus frequency of the suggested word.
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DictEntry {
    word: String,
    count: u64,
}

/// Symmetric-delete spelling corrector.
///
/// Every dictionary word is expanded into all of its delete variants up to
/// the configured edit distance. Lookup expands the input the same way and
/// intersects the two variant sets, so candidate generation never touches
/// the alphabet: the same index serves accented and unaccented words alike.
/// Candidates are then verified with true edit distance and ranked by
/// distance, frequency and finally the word itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellCorrector {
    entries: Vec<DictEntry>,
    words: HashMap<String, u32, RandomState>,
    deletes: HashMap<String, Vec<u32>, RandomState>,
    max_edit_distance: usize,
}

impl SpellCorrector {
    pub fn new(max_edit_distance: usize) -> Self {
        Self {
            entries: Vec::new(),
            words: HashMap::with_hasher(RandomState::new()),
            deletes: HashMap::with_hasher(RandomState::new()),
            max_edit_distance,
        }
    }

    /// Builds a corrector from `(word, count)` pairs in one go.
    pub fn from_entries<S: AsRef<str>>(entries: &[(S, u64)], max_edit_distance: usize) -> Self {
        let mut corrector = Self::new(max_edit_distance);
        for (word, count) in entries {
            corrector.add_word(word.as_ref(), *count);
        }
        debug!(
            "dictionary built: {} words, {} delete variants",
            corrector.len(),
            corrector.deletes.len()
        );
        corrector
    }

    /// Adds a word, summing counts when it is already present.
    pub fn add_word(&mut self, word: &str, count: u64) {
        if word.is_empty() {
            return;
        }
        if let Some(&id) = self.words.get(word) {
            self.entries[id as usize].count += count;
            return;
        }
        let id = self.entries.len() as u32;
        self.entries.push(DictEntry {
            word: word.to_string(),
            count,
        });
        self.words.insert(word.to_string(), id);
        for variant in delete_variants(word, self.max_edit_distance) {
            self.deletes.entry(variant).or_default().push(id);
        }
    }

    /// Number of dictionary words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Corpus frequency of a dictionary word, zero when absent.
    pub fn frequency(&self, word: &str) -> u64 {
        self.words
            .get(word)
            .map_or(0, |&id| self.entries[id as usize].count)
    }

    pub fn max_edit_distance(&self) -> usize {
        self.max_edit_distance
    }

    /// Ranked suggestions within the edit-distance budget, best first.
    pub fn lookup(&self, input: &str, limit: usize) -> Vec<Suggestion> {
        if limit == 0 {
            return Vec::new();
        }
        let input_chars: Vec<char> = input.chars().collect();
        let mut seen: HashSet<u32, RandomState> = HashSet::with_hasher(RandomState::new());
        let mut suggestions = Vec::new();
        for variant in delete_variants(input, self.max_edit_distance) {
            if let Some(ids) = self.deletes.get(&variant) {
                for &id in ids {
                    if !seen.insert(id) {
                        continue;
                    }
                    let entry = &self.entries[id as usize];
                    let word_chars: Vec<char> = entry.word.chars().collect();
                    let distance = osa_distance(&input_chars, &word_chars, self.max_edit_distance);
                    if distance <= self.max_edit_distance {
                        suggestions.push(Suggestion {
                            word: entry.word.clone(),
                            distance,
                            count: entry.count,
                        });
                    }
                }
            }
        }
        suggestions.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| b.count.cmp(&a.count))
                .then_with(|| a.word.cmp(&b.word))
        });
        suggestions.truncate(limit);
        suggestions
    }

    /// Best correction for `input`. Dictionary words come back unchanged,
    /// and so does anything with no candidate in reach.
    pub fn correct(&self, input: &str) -> String {
        if self.contains(input) {
            return input.to_string();
        }
        match self.lookup(input, 1).into_iter().next() {
            Some(suggestion) => suggestion.word,
            None => input.to_string(),
        }
    }
}

/// The word itself plus every string reachable by deleting up to
/// `max_depth` characters. Deletion works on chars, never bytes.
fn delete_variants(word: &str, max_depth: usize) -> HashSet<String, RandomState> {
    let mut variants: HashSet<String, RandomState> = HashSet::with_hasher(RandomState::new());
    variants.insert(word.to_string());
    let mut frontier: Vec<Vec<char>> = vec![word.chars().collect()];
    for _ in 0..max_depth {
        let mut next = Vec::new();
        for chars in &frontier {
            if chars.len() <= 1 {
                continue;
            }
            for i in 0..chars.len() {
                let mut shorter = chars.clone();
                shorter.remove(i);
                let variant: String = shorter.iter().collect();
                if variants.insert(variant) {
                    next.push(shorter);
                }
            }
        }
        frontier = next;
    }
    variants
}

/// Optimal string alignment distance: insert, delete, substitute, plus
/// adjacent transposition as a single edit. Anything past `cap` comes back
/// as `cap + 1`; the scan stops as soon as a whole row is out of reach.
fn osa_distance(a: &[char], b: &[char], cap: usize) -> usize {
    let n = a.len();
    let m = b.len();
    if n.abs_diff(m) > cap {
        return cap.saturating_add(1);
    }
    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }
    let mut prev2: Vec<usize> = vec![0; m + 1];
    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr: Vec<usize> = vec![0; m + 1];
    for i in 1..=n {
        curr[0] = i;
        let mut row_min = i;
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                curr[j] = curr[j].min(prev2[j - 2] + 1);
            }
            row_min = row_min.min(curr[j]);
        }
        if row_min > cap {
            return cap.saturating_add(1);
        }
        std::mem::swap(&mut prev2, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[m].min(cap.saturating_add(1))
}
