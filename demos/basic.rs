use palavra::{ModelError, TextModel};

fn main() -> Result<(), ModelError> {
    env_logger::init();

    let documents = [
        "o gato preto dorme na casa velha",
        "o cachorro grande late para o carteiro",
        "a casa velha fica na rua movimentada",
        "o gato branco brinca com o cachorro no quintal",
    ];

    // fit the vectorizer
    let mut model = TextModel::default();
    model.fit_documents(&documents)?;
    println!("vocabulary: {} terms", model.vocabulary_len()?);

    // vectorize a new text
    let vector = model.transform("o gato dorme no quintal")?;
    println!("vector length: {}", vector.len());

    // search the fitted documents
    let hits = model.similar_documents("gato dorme", 3)?;
    println!("most similar documents:");
    for (key, score) in hits.iter() {
        println!("  doc {}: {:.4}", key, score);
    }

    Ok(())
}
