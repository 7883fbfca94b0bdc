pub mod serde;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ModelConfig;
use crate::embedding::{vocab::Vocabulary, WordEmbedding};
use crate::error::ModelError;
use crate::generator::TextGenerator;
use crate::speller::{SpellCorrector, Suggestion};
use crate::tokenize::Tokenizer;
use crate::vectorizer::{corpus::Corpus, scoring::Hits, term::TermFrequency, TfIdfVectorizer};

/// Document vectors, word embeddings and spelling correction behind one
/// orchestrating type.
///
/// The three engines are independent: fit the vectorizer on documents,
/// train the embedding on sentences, load a dictionary for the corrector,
/// in any order and any subset. Every operation that depends on an engine
/// returns an error until that engine is ready. One tokenizer, set in
/// [`ModelConfig`], normalizes text for all three.
///
/// # Examples
/// ```
/// use palavra::{EmbeddingConfig, ModelConfig, TextModel};
///
/// let config = ModelConfig {
///     embedding: EmbeddingConfig {
///         dimension: 16,
///         min_count: 1,
///         epochs: 10,
///         seed: Some(42),
///         ..EmbeddingConfig::default()
///     },
///     ..ModelConfig::default()
/// };
/// let mut model = TextModel::new(config).unwrap();
///
/// let corpus = [
///     "o gato preto dorme na casa",
///     "o gato branco brinca na rua",
///     "o cachorro late para o gato",
/// ];
/// model.fit_documents(&corpus).unwrap();
/// model.train_embedding(&corpus).unwrap();
/// model.load_dictionary_text(&corpus.join(" ")).unwrap();
///
/// let vector = model.transform("gato na casa").unwrap();
/// assert_eq!(vector.len(), model.vocabulary_len().unwrap());
/// let text = model.generate_text_seeded("gato", 5, 7).unwrap();
/// assert_eq!(text.split_whitespace().count(), 6);
/// assert_eq!(model.correct("gto").unwrap(), "gato");
/// ```
#[derive(Debug)]
pub struct TextModel {
    pub(crate) config: ModelConfig,
    pub(crate) corpus: Arc<Corpus>,
    pub(crate) vectorizer: Option<TfIdfVectorizer<f32, usize>>,
    pub(crate) embedding: Option<WordEmbedding>,
    pub(crate) speller: Option<SpellCorrector>,
}

impl Default for TextModel {
    fn default() -> Self {
        Self {
            config: ModelConfig::default(),
            corpus: Arc::new(Corpus::new()),
            vectorizer: None,
            embedding: None,
            speller: None,
        }
    }
}

impl TextModel {
    /// Builds an empty model. Fails when the configuration is out of range.
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.vectorizer.is_some()
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    pub fn has_dictionary(&self) -> bool {
        self.speller.is_some()
    }

    /// The trained embedding, if any. Exposes neighbor and analogy lookups
    /// beyond what the model surface wraps.
    pub fn embedding(&self) -> Option<&WordEmbedding> {
        self.embedding.as_ref()
    }

    /// The fitted speller, if any.
    pub fn speller(&self) -> Option<&SpellCorrector> {
        self.speller.as_ref()
    }

    /// Vocabulary width of the fitted vectorizer, and therefore the length
    /// of every vector [`transform`](Self::transform) returns.
    pub fn vocabulary_len(&self) -> Result<usize, ModelError> {
        Ok(self.fitted()?.dim_len())
    }

    /// Indexes `documents` for TF-IDF lookups. Replaces any previous fit
    /// entirely; document keys are positions in the slice.
    pub fn fit_documents<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<(), ModelError> {
        if documents.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }
        let corpus = Arc::new(Corpus::new());
        let mut vectorizer = TfIdfVectorizer::new(Arc::clone(&corpus));
        for (key, document) in documents.iter().enumerate() {
            let tokens = self.config.tokenizer.tokenize(document.as_ref());
            vectorizer.add_doc(key, &TermFrequency::from(&tokens[..]));
        }
        if vectorizer.dim_len() == 0 {
            return Err(ModelError::EmptyCorpus);
        }
        vectorizer.update_idf();
        info!(
            "fitted {} documents, vocabulary of {} terms",
            vectorizer.doc_num(),
            vectorizer.dim_len()
        );
        self.corpus = corpus;
        self.vectorizer = Some(vectorizer);
        Ok(())
    }

    /// TF-IDF vector of `text` against the fitted vocabulary,
    /// L2-normalized, in stable dimension order. Unknown terms contribute
    /// nothing; a text of only unknown terms maps to the zero vector.
    pub fn transform(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let vectorizer = self.fitted()?;
        let tokens = self.config.tokenizer.tokenize(text);
        Ok(vectorizer.transform_uncheck_idf(&TermFrequency::from(&tokens[..])))
    }

    /// [`fit_documents`](Self::fit_documents) followed by one
    /// [`transform`](Self::transform) per input, in input order.
    pub fn fit_transform<S: AsRef<str>>(
        &mut self,
        documents: &[S],
    ) -> Result<Vec<Vec<f32>>, ModelError> {
        self.fit_documents(documents)?;
        documents
            .iter()
            .map(|d| self.transform(d.as_ref()))
            .collect()
    }

    /// The fitted documents most similar to `text`, best first, at most
    /// `limit` of them. Keys are the positions passed to
    /// [`fit_documents`](Self::fit_documents).
    pub fn similar_documents(&self, text: &str, limit: usize) -> Result<Hits<usize>, ModelError> {
        let vectorizer = self.fitted()?;
        let tokens = self.config.tokenizer.tokenize(text);
        let mut hits = vectorizer.similarity_uncheck_idf(
            &TermFrequency::from(&tokens[..]),
            &self.config.vectorizer.similarity,
        );
        hits.sort_by_score().truncate(limit);
        Ok(hits)
    }

    /// Trains the Word2Vec embedding on `sentences`. Replaces any previous
    /// embedding. The vocabulary keeps words seen at least
    /// `embedding.min_count` times and must end up with two or more.
    pub fn train_embedding<S: AsRef<str>>(&mut self, sentences: &[S]) -> Result<(), ModelError> {
        if sentences.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }
        let tokenized: Vec<Vec<String>> = sentences
            .iter()
            .map(|s| self.config.tokenizer.tokenize(s.as_ref()))
            .collect();
        let vocab = Vocabulary::build(&tokenized, self.config.embedding.min_count);
        if vocab.len() < 2 {
            return Err(ModelError::VocabularyTooSmall {
                found: vocab.len(),
                need: 2,
            });
        }
        let encoded: Vec<Vec<usize>> = tokenized.iter().map(|s| vocab.encode(s)).collect();
        let embedding = WordEmbedding::train(vocab, &encoded, &self.config.embedding);
        info!(
            "embedding trained: {} words, {} dimensions",
            embedding.len(),
            embedding.dimension()
        );
        self.embedding = Some(embedding);
        Ok(())
    }

    /// The `limit` words closest to `word` in the trained embedding,
    /// best first, the query excluded.
    pub fn nearest_words(&self, word: &str, limit: usize) -> Result<Vec<(String, f32)>, ModelError> {
        let embedding = self.trained()?;
        let normalized = self.normalize_query(word)?;
        embedding
            .nearest(&normalized, limit)
            .ok_or(ModelError::UnknownWord(normalized))
    }

    /// Generates `len` words from `seed` by the similarity-weighted random
    /// walk, returning the space-joined text with the seed in front.
    pub fn generate_text(&self, seed: &str, len: usize) -> Result<String, ModelError> {
        self.generate_with_rng(seed, len, &mut rand::thread_rng())
    }

    /// Like [`generate_text`](Self::generate_text) but fully reproducible:
    /// the same model, seed word and `rng_seed` always walk the same path.
    pub fn generate_text_seeded(
        &self,
        seed: &str,
        len: usize,
        rng_seed: u64,
    ) -> Result<String, ModelError> {
        self.generate_with_rng(seed, len, &mut StdRng::seed_from_u64(rng_seed))
    }

    fn generate_with_rng<R: Rng>(
        &self,
        seed: &str,
        len: usize,
        rng: &mut R,
    ) -> Result<String, ModelError> {
        let embedding = self.trained()?;
        let normalized = self.normalize_query(seed)?;
        TextGenerator::new(embedding, &self.config.generator).generate(&normalized, len, rng)
    }

    /// Builds the spelling dictionary from `(word, count)` pairs. Words are
    /// normalized through the shared tokenizer; entries that normalize to
    /// the same word merge their counts, entries the tokenizer filters out
    /// are skipped. Replaces any previous dictionary.
    pub fn load_dictionary<S: AsRef<str>>(&mut self, entries: &[(S, u64)]) -> Result<(), ModelError> {
        let mut speller = SpellCorrector::new(self.config.speller.max_edit_distance);
        for (word, count) in entries {
            if let Some(normalized) = self.config.tokenizer.normalize_word(word.as_ref()) {
                speller.add_word(&normalized, *count);
            }
        }
        if speller.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }
        info!("dictionary loaded: {} words", speller.len());
        self.speller = Some(speller);
        Ok(())
    }

    /// Builds the spelling dictionary from running text: tokenizes it and
    /// uses token counts as word frequencies.
    pub fn load_dictionary_text(&mut self, text: &str) -> Result<(), ModelError> {
        let tokens = self.config.tokenizer.tokenize(text);
        if tokens.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }
        let freq = TermFrequency::from(&tokens[..]);
        let mut entries: Vec<(String, u64)> =
            freq.iter().map(|(w, c)| (w.to_string(), c)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let speller =
            SpellCorrector::from_entries(&entries, self.config.speller.max_edit_distance);
        info!("dictionary loaded: {} words", speller.len());
        self.speller = Some(speller);
        Ok(())
    }

    /// Best correction for `word` against the loaded dictionary. Words the
    /// dictionary knows, and words nothing in the dictionary can reach,
    /// come back unchanged (normalized).
    pub fn correct(&self, word: &str) -> Result<String, ModelError> {
        let speller = self.loaded()?;
        match self.config.tokenizer.normalize_word(word) {
            Some(normalized) => Ok(speller.correct(&normalized)),
            None => Ok(word.to_string()),
        }
    }

    /// Ranked correction candidates for `word`, closest and most frequent
    /// first, at most `limit` of them.
    pub fn suggestions(&self, word: &str, limit: usize) -> Result<Vec<Suggestion>, ModelError> {
        let speller = self.loaded()?;
        match self.config.tokenizer.normalize_word(word) {
            Some(normalized) => Ok(speller.lookup(&normalized, limit)),
            None => Ok(Vec::new()),
        }
    }

    /// Writes the whole model, engines and config included, as one CBOR
    /// file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let file = File::create(&path)?;
        self.save_to_writer(BufWriter::new(file))?;
        info!("model saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reads a model previously written by [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let file = File::open(&path)?;
        let model = Self::load_from_reader(BufReader::new(file))?;
        info!("model loaded from {}", path.as_ref().display());
        Ok(model)
    }

    /// [`save`](Self::save) into any writer.
    pub fn save_to_writer<W: Write>(&self, writer: W) -> Result<(), ModelError> {
        serde_cbor::to_writer(writer, self)?;
        Ok(())
    }

    /// [`load`](Self::load) from any reader.
    pub fn load_from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let data: serde::TextModelData = serde_cbor::from_reader(reader)?;
        Ok(data.into_model())
    }

    fn fitted(&self) -> Result<&TfIdfVectorizer<f32, usize>, ModelError> {
        self.vectorizer.as_ref().ok_or(ModelError::VectorizerNotFitted)
    }

    fn trained(&self) -> Result<&WordEmbedding, ModelError> {
        self.embedding.as_ref().ok_or(ModelError::EmbeddingNotTrained)
    }

    fn loaded(&self) -> Result<&SpellCorrector, ModelError> {
        self.speller.as_ref().ok_or(ModelError::SpellerNotLoaded)
    }

    fn normalize_query(&self, word: &str) -> Result<String, ModelError> {
        self.config
            .tokenizer
            .normalize_word(word)
            .ok_or_else(|| ModelError::UnknownWord(word.to_string()))
    }

    /// The shared tokenizer, for callers that want to preprocess text the
    /// exact way the model does.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.config.tokenizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmbeddingConfig;

    fn corpus() -> Vec<&'static str> {
        vec![
            "o gato preto dorme na casa velha",
            "o gato branco brinca na rua movimentada",
            "o cachorro grande late para o gato preto",
            "a casa velha fica na rua movimentada",
            "o cachorro dorme na casa com o gato",
        ]
    }

    fn model() -> TextModel {
        TextModel::new(ModelConfig {
            embedding: EmbeddingConfig {
                dimension: 12,
                window: 3,
                min_count: 1,
                epochs: 8,
                seed: Some(42),
                ..EmbeddingConfig::default()
            },
            ..ModelConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn operations_fail_before_their_engine_is_ready() {
        let model = TextModel::default();
        assert!(matches!(
            model.transform("gato"),
            Err(ModelError::VectorizerNotFitted)
        ));
        assert!(matches!(
            model.similar_documents("gato", 3),
            Err(ModelError::VectorizerNotFitted)
        ));
        assert!(matches!(
            model.nearest_words("gato", 3),
            Err(ModelError::EmbeddingNotTrained)
        ));
        assert!(matches!(
            model.generate_text("gato", 3),
            Err(ModelError::EmbeddingNotTrained)
        ));
        assert!(matches!(
            model.correct("gato"),
            Err(ModelError::SpellerNotLoaded)
        ));
    }

    #[test]
    fn new_rejects_invalid_configs() {
        let config = ModelConfig {
            embedding: EmbeddingConfig {
                dimension: 0,
                ..EmbeddingConfig::default()
            },
            ..ModelConfig::default()
        };
        assert!(matches!(
            TextModel::new(config),
            Err(ModelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn fit_rejects_empty_and_unusable_corpora() {
        let mut model = model();
        let empty: Vec<&str> = Vec::new();
        assert!(matches!(
            model.fit_documents(&empty),
            Err(ModelError::EmptyCorpus)
        ));
        assert!(matches!(
            model.fit_documents(&["...", "!!!"]),
            Err(ModelError::EmptyCorpus)
        ));
        assert!(!model.is_fitted());
    }

    #[test]
    fn transform_rows_share_length_and_order() {
        let mut model = model();
        model.fit_documents(&corpus()).unwrap();
        let a = model.transform("o gato dorme").unwrap();
        let b = model.transform("texto totalmente desconhecido aqui").unwrap();
        assert_eq!(a.len(), model.vocabulary_len().unwrap());
        assert_eq!(a.len(), b.len());
        // Unknown-only text maps to the zero vector.
        assert!(b.iter().all(|&v| v == 0.0));
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fit_transform_returns_one_row_per_document() {
        let mut model = model();
        let rows = model.fit_transform(&corpus()).unwrap();
        assert_eq!(rows.len(), corpus().len());
        let width = model.vocabulary_len().unwrap();
        assert!(rows.iter().all(|r| r.len() == width));
    }

    #[test]
    fn refit_replaces_the_previous_state() {
        let mut model = model();
        model.fit_documents(&["gato gato gato"]).unwrap();
        model.fit_documents(&["carro rápido na estrada"]).unwrap();
        // Old vocabulary is gone: "gato" is unknown after the refit.
        let row = model.transform("gato").unwrap();
        assert!(row.iter().all(|&v| v == 0.0));
        assert_eq!(model.vocabulary_len().unwrap(), 4);
    }

    #[test]
    fn similar_documents_finds_the_overlapping_doc() {
        let mut model = model();
        model.fit_documents(&corpus()).unwrap();
        let hits = model.similar_documents("cachorro late", 2).unwrap();
        assert!(hits.len() <= 2);
        assert_eq!(hits.list[0].0, 2);
    }

    #[test]
    fn similar_documents_of_unknown_text_is_empty() {
        let mut model = model();
        model.fit_documents(&corpus()).unwrap();
        let hits = model.similar_documents("xyzzy qwerty", 5).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn train_embedding_guards_its_inputs() {
        let mut model = model();
        let empty: Vec<&str> = Vec::new();
        assert!(matches!(
            model.train_embedding(&empty),
            Err(ModelError::EmptyCorpus)
        ));
        assert!(matches!(
            model.train_embedding(&["gato gato gato"]),
            Err(ModelError::VocabularyTooSmall { found: 1, need: 2 })
        ));
    }

    #[test]
    fn nearest_words_normalizes_queries_and_flags_unknowns() {
        let mut model = model();
        model.train_embedding(&corpus()).unwrap();
        let hits = model.nearest_words("GATO!", 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|(w, _)| w != "gato"));
        assert!(matches!(
            model.nearest_words("dragão", 3),
            Err(ModelError::UnknownWord(w)) if w == "dragão"
        ));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let mut model = model();
        model.train_embedding(&corpus()).unwrap();
        let a = model.generate_text_seeded("gato", 6, 123).unwrap();
        let b = model.generate_text_seeded("gato", 6, 123).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.split_whitespace().count(), 7);
        assert!(a.starts_with("gato"));
    }

    #[test]
    fn dictionary_corrects_typos_from_text() {
        let mut model = model();
        model.load_dictionary_text(&corpus().join(" ")).unwrap();
        assert_eq!(model.correct("gto").unwrap(), "gato");
        assert_eq!(model.correct("Gato").unwrap(), "gato");
        let hits = model.suggestions("cassa", 2).unwrap();
        assert_eq!(hits[0].word, "casa");
        assert!(hits.len() <= 2);
    }

    #[test]
    fn dictionary_entries_merge_after_normalization() {
        let mut model = model();
        model
            .load_dictionary(&[("Casa", 2u64), ("casa", 3u64), ("rua", 1u64)])
            .unwrap();
        let speller = model.speller().unwrap();
        assert_eq!(speller.len(), 2);
        assert_eq!(speller.frequency("casa"), 5);
    }

    #[test]
    fn uncorrectable_words_come_back_unchanged() {
        let mut model = model();
        model.load_dictionary_text("gato casa rua").unwrap();
        assert_eq!(model.correct("zzzzzz").unwrap(), "zzzzzz");
        assert_eq!(model.correct("...").unwrap(), "...");
    }
}
