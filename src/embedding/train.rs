//! Word2Vec training with negative sampling.
//!
//! Two modes over the same pair machinery: skip-gram feeds each
//! (center, context) pair through with the center row as hidden layer,
//! CBOW averages the context rows and predicts the center. Negative
//! targets come from the unigram distribution raised to the 3/4 power.

use log::{debug, info};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EmbeddingConfig;
use crate::embedding::{vocab::Vocabulary, WordEmbedding};

/// Dot products are clamped to this magnitude before the sigmoid.
const MAX_EXP: f32 = 6.0;
/// The decayed learning rate never drops below this.
const MIN_LEARNING_RATE: f32 = 1e-4;

/// Runs the full training schedule and returns the trained model.
///
/// `sentences` are index-encoded through `vocab`; out-of-vocabulary words
/// must already be gone. The learning rate decays linearly per processed
/// center word across all epochs.
pub(crate) fn run(
    vocab: Vocabulary,
    sentences: &[Vec<usize>],
    config: &EmbeddingConfig,
) -> WordEmbedding {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let dimension = config.dimension;
    let mut model = WordEmbedding::init(vocab, dimension, &mut rng);
    if model.is_empty() {
        return model;
    }
    let table = WeightedIndex::new(model.vocab.unigram_weights()).ok();
    let vocab_len = model.len();

    info!(
        "training {} embedding: {} words, {} dims, {} epochs",
        if config.cbow { "cbow" } else { "skip-gram" },
        vocab_len,
        dimension,
        config.epochs
    );

    let total_words: u64 = sentences.iter().map(|s| s.len() as u64).sum();
    let total_steps = total_words.saturating_mul(config.epochs as u64).max(1);
    let lr_floor = (config.learning_rate / 10.0).min(MIN_LEARNING_RATE);
    let mut processed: u64 = 0;

    for epoch in 0..config.epochs {
        for sentence in sentences {
            for pos in 0..sentence.len() {
                let progress = processed as f32 / total_steps as f32;
                let lr = (config.learning_rate * (1.0 - progress)).max(lr_floor);
                processed += 1;

                // Effective radius varies per center word, which weights
                // close context more heavily than the window edge.
                let radius = rng.gen_range(1..=config.window.max(1));
                let start = pos.saturating_sub(radius);
                let end = (pos + radius + 1).min(sentence.len());
                let center = sentence[pos];

                if config.cbow {
                    let context: Vec<usize> = (start..end)
                        .filter(|&p| p != pos)
                        .map(|p| sentence[p])
                        .collect();
                    if context.is_empty() {
                        continue;
                    }
                    cbow_step(
                        &mut model.input,
                        &mut model.output,
                        dimension,
                        &context,
                        center,
                        lr,
                        config.negative_samples,
                        table.as_ref(),
                        vocab_len,
                        &mut rng,
                    );
                } else {
                    for ctx_pos in start..end {
                        if ctx_pos == pos {
                            continue;
                        }
                        skip_gram_step(
                            &mut model.input,
                            &mut model.output,
                            dimension,
                            center,
                            sentence[ctx_pos],
                            lr,
                            config.negative_samples,
                            table.as_ref(),
                            vocab_len,
                            &mut rng,
                        );
                    }
                }
            }
        }
        debug!(
            "epoch {}/{} done, {} center words processed",
            epoch + 1,
            config.epochs,
            processed
        );
    }
    model
}

/// One skip-gram pair: the center row is the hidden layer, the context
/// word is the positive target.
#[allow(clippy::too_many_arguments)]
fn skip_gram_step<R: Rng>(
    input: &mut [f32],
    output: &mut [f32],
    dimension: usize,
    center: usize,
    context: usize,
    lr: f32,
    negatives: usize,
    table: Option<&WeightedIndex<f64>>,
    vocab_len: usize,
    rng: &mut R,
) {
    let mut err = vec![0.0f32; dimension];
    let hidden = &input[center * dimension..(center + 1) * dimension];
    train_target(hidden, output, context, 1.0, lr, &mut err);
    for _ in 0..negatives {
        let neg = draw_negative(table, vocab_len, rng);
        if neg == context {
            continue;
        }
        train_target(hidden, output, neg, 0.0, lr, &mut err);
    }
    let row = &mut input[center * dimension..(center + 1) * dimension];
    for (w, e) in row.iter_mut().zip(err.iter()) {
        *w += e;
    }
}

/// One CBOW step: the averaged context rows are the hidden layer, the
/// center word is the positive target. The accumulated error is applied
/// to every context row in full.
#[allow(clippy::too_many_arguments)]
fn cbow_step<R: Rng>(
    input: &mut [f32],
    output: &mut [f32],
    dimension: usize,
    context: &[usize],
    center: usize,
    lr: f32,
    negatives: usize,
    table: Option<&WeightedIndex<f64>>,
    vocab_len: usize,
    rng: &mut R,
) {
    let mut hidden = vec![0.0f32; dimension];
    for &c in context {
        for (h, v) in hidden.iter_mut().zip(input[c * dimension..(c + 1) * dimension].iter()) {
            *h += *v;
        }
    }
    let inv = 1.0 / context.len() as f32;
    for h in &mut hidden {
        *h *= inv;
    }

    let mut err = vec![0.0f32; dimension];
    train_target(&hidden, output, center, 1.0, lr, &mut err);
    for _ in 0..negatives {
        let neg = draw_negative(table, vocab_len, rng);
        if neg == center {
            continue;
        }
        train_target(&hidden, output, neg, 0.0, lr, &mut err);
    }
    for &c in context {
        let row = &mut input[c * dimension..(c + 1) * dimension];
        for (w, e) in row.iter_mut().zip(err.iter()) {
            *w += e;
        }
    }
}

/// SGD update of one (hidden, target) pair. Accumulates the input-side
/// error in `err` so the caller applies it once per hidden layer.
fn train_target(
    hidden: &[f32],
    output: &mut [f32],
    target: usize,
    label: f32,
    lr: f32,
    err: &mut [f32],
) {
    let dimension = hidden.len();
    let row = &mut output[target * dimension..(target + 1) * dimension];
    let dot: f32 = hidden.iter().zip(row.iter()).map(|(h, o)| h * o).sum();
    let gradient = (label - sigmoid(dot)) * lr;
    for i in 0..dimension {
        err[i] += gradient * row[i];
        row[i] += gradient * hidden[i];
    }
}

fn draw_negative<R: Rng>(
    table: Option<&WeightedIndex<f64>>,
    vocab_len: usize,
    rng: &mut R,
) -> usize {
    match table {
        Some(t) => t.sample(rng),
        None => rng.gen_range(0..vocab_len),
    }
}

fn sigmoid(x: f32) -> f32 {
    let x = x.clamp(-MAX_EXP, MAX_EXP);
    1.0 / (1.0 + (-x).exp())
}
