pub mod embeddings;
pub mod store;

pub use embeddings::EmbeddingClient;
pub use store::{IndexedStatement, ScoredStatement, VectorStore};
