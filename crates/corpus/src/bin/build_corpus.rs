use anyhow::{Context, Result};
use std::path::Path;

use corpus::CorpusBuilder;
use index::EmbeddingClient;

const TRIPLES_FILE: &str = "triples.txt";
const INDEX_DIR: &str = "cim-index";

#[tokio::main]
async fn main() -> Result<()> {
    let triples_text = std::fs::read_to_string(TRIPLES_FILE)
        .with_context(|| format!("Failed to read {}", TRIPLES_FILE))?;

    let builder = CorpusBuilder::new(EmbeddingClient::default());
    let indexed = builder.build(&triples_text, Path::new(INDEX_DIR)).await?;

    println!("Indexed {} statements into {}/", indexed, INDEX_DIR);
    Ok(())
}
