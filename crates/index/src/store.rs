use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File holding the serialized statements inside the index directory.
const STATEMENTS_FILE: &str = "statements.json";

/// One indexed natural-language statement with its embedding vector.
/// Created at index-build time, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedStatement {
    pub id: String,
    pub text: String,
    /// Simplified subject of the source triple, carried as metadata.
    pub subject: String,
    pub embedding: Vec<f32>,
}

/// A search hit: statement text plus its cosine similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredStatement {
    pub text: String,
    pub subject: String,
    pub score: f32,
}

/// Flat vector store persisted as JSON under a fixed directory.
/// Search is an exact cosine scan over all statements.
pub struct VectorStore {
    statements: Vec<IndexedStatement>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self {
            statements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn add(&mut self, statement: IndexedStatement) {
        self.statements.push(statement);
    }

    /// Return the top-k statements by cosine similarity, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredStatement> {
        let mut scored: Vec<ScoredStatement> = self
            .statements
            .iter()
            .map(|s| ScoredStatement {
                text: s.text.clone(),
                subject: s.subject.clone(),
                score: cosine_similarity(query, &s.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    /// Persist the store under `dir` (created if missing).
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create index directory {}", dir.display()))?;

        let path = dir.join(STATEMENTS_FILE);
        let json = serde_json::to_string(&self.statements)
            .context("Failed to serialize statements")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Load a persisted store from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(STATEMENTS_FILE);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to open vector index at {}", path.display()))?;

        let statements: Vec<IndexedStatement> =
            serde_json::from_str(&json).context("Failed to parse vector index")?;

        Ok(Self { statements })
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
