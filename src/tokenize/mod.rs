use std::collections::HashSet;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

/// Portuguese function words that carry no topical signal.
///
/// Kept short on purpose. Callers that need a different list can build a
/// `StopwordFilter` from their own slice.
const PORTUGUESE_STOPWORDS: &[&str] = &[
    "a", "à", "ao", "aos", "as", "às", "com", "como", "da", "das", "de", "dela", "dele", "do",
    "dos", "e", "é", "ela", "ele", "em", "entre", "era", "essa", "esse", "esta", "este", "eu",
    "foi", "há", "isso", "já", "lhe", "mais", "mas", "me", "mesmo", "meu", "minha", "muito",
    "na", "não", "nas", "no", "nos", "o", "os", "ou", "para", "pela", "pelo", "por", "quando",
    "que", "se", "sem", "ser", "seu", "sua", "são", "também", "te", "tem", "um", "uma", "você",
];

/// Membership set for stopword removal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopwordFilter {
    words: HashSet<String, RandomState>,
}

impl StopwordFilter {
    /// Builds a filter from an explicit word list.
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            words: words.iter().map(|w| w.as_ref().to_string()).collect(),
        }
    }

    /// The built-in Portuguese list.
    pub fn portuguese() -> Self {
        Self::new(PORTUGUESE_STOPWORDS)
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Splits raw text into normalized word tokens.
///
/// One `Tokenizer` is shared by the vectorizer, the embedding trainer and the
/// dictionary builder so that every engine sees the same token stream.
///
/// # Examples
/// ```
/// use palavra::Tokenizer;
///
/// let tokenizer = Tokenizer::new();
/// let tokens = tokenizer.tokenize("O gato, dormiu!");
/// assert_eq!(tokens, vec!["o", "gato", "dormiu"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokenizer {
    lowercase: bool,
    min_token_len: usize,
    strip_accents: bool,
    stopwords: Option<StopwordFilter>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            lowercase: true,
            min_token_len: 1,
            strip_accents: false,
            stopwords: None,
        }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether tokens are folded to lowercase. Defaults to `true`.
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Drops tokens shorter than `len` characters. Defaults to 1.
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    /// Maps accented Latin letters to their base form. Defaults to `false`
    /// so that Portuguese diacritics survive ("maçã" stays "maçã").
    pub fn with_strip_accents(mut self, strip: bool) -> Self {
        self.strip_accents = strip;
        self
    }

    /// Installs a stopword filter. `None` by default.
    pub fn with_stopwords(mut self, filter: StopwordFilter) -> Self {
        self.stopwords = Some(filter);
        self
    }

    /// Splits on every non-alphanumeric character except the apostrophe,
    /// then applies the configured normalization steps in order: lowercase,
    /// accent stripping, length filter, stopword filter.
    ///
    /// Word-internal apostrophes survive ("d'água" is one token); leading
    /// and trailing ones are quote marks and get trimmed away.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '\'')
            .map(|raw| raw.trim_matches('\''))
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                let mut token = if self.lowercase {
                    raw.to_lowercase()
                } else {
                    raw.to_string()
                };
                if self.strip_accents {
                    token = strip_accents(&token);
                }
                token
            })
            .filter(|token| token.chars().count() >= self.min_token_len)
            .filter(|token| match &self.stopwords {
                Some(filter) => !filter.is_stopword(token),
                None => true,
            })
            .collect()
    }

    /// Normalizes a single word the same way `tokenize` would.
    ///
    /// Returns `None` when the word is filtered out entirely, for example a
    /// stopword or a token below the length threshold.
    pub fn normalize_word(&self, word: &str) -> Option<String> {
        self.tokenize(word).into_iter().next()
    }
}

/// Replaces the accented letters common in Portuguese with their unaccented
/// base. Unknown characters pass through unchanged.
fn strip_accents(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'Ç' => 'C',
            'Ñ' => 'N',
            _ => c,
        })
        .collect()
}
