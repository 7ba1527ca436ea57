pub mod config;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod retriever;

pub use config::RagConfig;
pub use llm::{ChatClient, ChatMessage};
pub use pipeline::{PipelineAnswer, PipelineState, QueryPipeline};
pub use retriever::{RetrievedContext, Retriever};
