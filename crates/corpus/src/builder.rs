use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;

use index::{EmbeddingClient, IndexedStatement, VectorStore};

use crate::document::{parse_line, render_document};

/// Documents per embedding request. Batches are submitted sequentially;
/// the first failed batch aborts the whole build.
const BATCH_SIZE: usize = 100;

/// Generate a stable statement ID from the source triple line
fn statement_id(line: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(line.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

pub struct CorpusBuilder {
    embeddings: EmbeddingClient,
}

impl CorpusBuilder {
    pub fn new(embeddings: EmbeddingClient) -> Self {
        Self { embeddings }
    }

    /// Build the vector index from a triple file and persist it to `index_dir`.
    ///
    /// Returns the number of indexed statements.
    pub async fn build(&self, triples_text: &str, index_dir: &Path) -> Result<usize> {
        let lines: Vec<&str> = triples_text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();

        println!("Triple lines: {}", lines.len());

        // Malformed lines are dropped, not reported
        let mut documents = Vec::new();
        for line in &lines {
            if let Some(triple) = parse_line(line) {
                let text = render_document(&triple);
                documents.push((statement_id(line), text, triple.subject));
            }
        }

        println!("Documents after processing: {}", documents.len());

        let mut store = VectorStore::new();
        let batch_count = documents.len().div_ceil(BATCH_SIZE);

        for (batch_index, batch) in documents.chunks(BATCH_SIZE).enumerate() {
            println!("Embedding batch {} / {}", batch_index + 1, batch_count);

            let texts: Vec<String> = batch.iter().map(|(_, text, _)| text.clone()).collect();
            let embeddings = self
                .embeddings
                .embed_batch(&texts)
                .await
                .with_context(|| format!("Embedding batch {} failed", batch_index + 1))?;

            for ((id, text, subject), embedding) in batch.iter().zip(embeddings) {
                store.add(IndexedStatement {
                    id: id.clone(),
                    text: text.clone(),
                    subject: subject.clone(),
                    embedding,
                });
            }
        }

        store.save(index_dir)?;

        Ok(store.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_ids_are_stable_and_distinct() {
        let a = statement_id("<s> <p> \"a\" .");
        let b = statement_id("<s> <p> \"b\" .");

        assert_eq!(a, statement_id("<s> <p> \"a\" ."));
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }
}
