use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use index::{EmbeddingClient, ScoredStatement, VectorStore};

/// Retrieved context for one question: the newline-joined statement text
/// handed to the pipeline, plus the scored statements for display.
pub struct RetrievedContext {
    pub context: String,
    pub statements: Vec<ScoredStatement>,
}

pub struct Retriever {
    store: VectorStore,
    embeddings: EmbeddingClient,
    search_k: usize,
}

impl Retriever {
    /// Open the persisted index fresh; call once per request.
    pub fn open(index_dir: &Path, embeddings: EmbeddingClient, search_k: usize) -> Result<Self> {
        let store = VectorStore::load(index_dir)?;

        Ok(Self {
            store,
            embeddings,
            search_k,
        })
    }

    /// Lower-case and replace everything outside `[a-z0-9]` with a space.
    pub fn normalize_question(question: &str) -> String {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"[^a-z0-9]").unwrap());

        re.replace_all(&question.to_lowercase(), " ").to_string()
    }

    /// Embed the normalized question and return the top-K statements as
    /// context. No threshold, no deduplication.
    pub async fn retrieve(&self, question: &str) -> Result<RetrievedContext> {
        let normalized = Self::normalize_question(question);

        let query_embedding = self
            .embeddings
            .embed(&normalized)
            .await
            .context("Failed to embed question")?;

        let statements = self.store.search(&query_embedding, self.search_k);

        let context = statements
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(RetrievedContext {
            context,
            statements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_lower_cases_and_spaces_out_punctuation() {
        assert_eq!(
            Retriever::normalize_question("List all BaseVoltage in the model."),
            "list all basevoltage in the model "
        );
    }

    #[test]
    fn normalization_keeps_digits() {
        assert_eq!(
            Retriever::normalize_question("CIM-schema-cim16?"),
            "cim schema cim16 "
        );
    }
}
