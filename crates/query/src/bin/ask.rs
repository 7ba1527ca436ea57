use anyhow::{Context, Result};

use index::EmbeddingClient;
use query::{QueryPipeline, RagConfig, Retriever};

const DEFAULT_QUESTION: &str = "List all BaseVoltage in the model.";
const DEBUG_CONTEXT_FILE: &str = "debug_cim_context.txt";

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);

    let xml_document = match args.next() {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read XML document {}", path))?,
        None => String::new(),
    };

    let question = args.next().unwrap_or_else(|| DEFAULT_QUESTION.to_string());

    println!("\n=== Question: {}", question);

    let config = RagConfig::default();
    let embeddings = EmbeddingClient::new(
        config.ollama_url.clone(),
        config.embedding_model.clone(),
    );

    let retriever = Retriever::open(&config.index_dir, embeddings, config.search_k)?;
    let retrieved = retriever.retrieve(&question).await?;

    println!(
        "\n--- CIM Context Retrieved: {} chunks ---",
        retrieved.statements.len()
    );
    for (i, statement) in retrieved.statements.iter().enumerate() {
        let preview: String = statement.text.chars().take(200).collect();
        println!("[{}] {} ...", i + 1, preview);
    }

    std::fs::write(DEBUG_CONTEXT_FILE, &retrieved.context)
        .with_context(|| format!("Failed to write {}", DEBUG_CONTEXT_FILE))?;

    let pipeline = QueryPipeline::new(&config);
    let answer = pipeline
        .run(question, retrieved.context, xml_document)
        .await?;

    println!("\n=== SPARQL ===\n{}", answer.sparql);
    println!("\n=== Explanation ===\n{}", answer.explanation);
    println!(
        "\n=== Extraction ===\n{}",
        serde_json::to_string_pretty(&answer.extraction)?
    );

    Ok(())
}
