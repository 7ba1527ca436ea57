use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration for the retrieval and query pipeline.
///
/// Paths and model names are fixed by convention; binaries construct the
/// default and go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    pub ollama_url: String,
    pub embedding_model: String,
    pub chat_model: String,
    /// Sampling temperature for query generation (favors determinism).
    pub generate_temperature: f32,
    /// Sampling temperature for explanation (favors fluency).
    pub explain_temperature: f32,
    /// Number of indexed statements retrieved per question.
    pub search_k: usize,
    pub index_dir: PathBuf,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            chat_model: "gemma3:1b".to_string(),
            generate_temperature: 0.1,
            explain_temperature: 0.5,
            search_k: 8,
            index_dir: PathBuf::from("cim-index"),
        }
    }
}
