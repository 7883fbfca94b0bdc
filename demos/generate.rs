use palavra::{EmbeddingConfig, ModelConfig, ModelError, TextModel};

fn main() -> Result<(), ModelError> {
    env_logger::init();

    let sentences = [
        "o gato preto dorme na casa velha",
        "o gato branco brinca na rua movimentada",
        "o cachorro grande late para o gato preto",
        "a casa velha fica na rua movimentada",
        "o cachorro dorme na casa com o gato",
        "o gato preto e o cachorro grande brincam na rua",
    ];

    let config = ModelConfig {
        embedding: EmbeddingConfig {
            dimension: 24,
            window: 3,
            min_count: 1,
            epochs: 30,
            seed: Some(42),
            ..EmbeddingConfig::default()
        },
        ..ModelConfig::default()
    };
    let mut model = TextModel::new(config)?;

    // train the embedding and build the dictionary from the same text
    model.train_embedding(&sentences)?;
    model.load_dictionary_text(&sentences.join(" "))?;

    // neighbors in the embedding space
    println!("closest to \"gato\":");
    for (word, score) in model.nearest_words("gato", 5)? {
        println!("  {}: {:.4}", word, score);
    }

    // weighted random walk from a seed word
    let text = model.generate_text_seeded("gato", 10, 7)?;
    println!("generated: {}", text);

    // fix a typo against the dictionary
    println!("correct(\"cachoro\") = {}", model.correct("cachoro")?);

    Ok(())
}
