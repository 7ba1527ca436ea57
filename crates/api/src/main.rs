use anyhow::{Context, Result, anyhow};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use index::EmbeddingClient;
use query::{PipelineAnswer, QueryPipeline, RagConfig, Retriever};

const UPLOAD_DIR: &str = "uploads";
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone)]
struct AppState {
    config: RagConfig,
}

#[derive(Serialize)]
struct AskResponse {
    answer: PipelineAnswer,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let state = Arc::new(AppState {
        config: RagConfig::default(),
    });

    let app = Router::new()
        .route("/ask", post(ask))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind 0.0.0.0:3000");

    tracing::info!("Server listening on http://localhost:3000");

    axum::serve(listener, app).await.expect("Server failed");
}

/// One endpoint: multipart `question` text field plus `file` upload.
/// Every uncaught failure collapses to the generic 500 envelope.
async fn ask(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AskResponse>, (StatusCode, Json<ErrorResponse>)> {
    match handle_ask(&state.config, multipart).await {
        Ok(answer) => Ok(Json(AskResponse { answer })),
        Err(err) => {
            tracing::error!("request failed: {:#}", err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Error while processing question".to_string(),
                }),
            ))
        }
    }
}

async fn handle_ask(config: &RagConfig, mut multipart: Multipart) -> Result<PipelineAnswer> {
    let mut question = None;
    let mut file_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .context("Failed to read multipart field")?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("question") => {
                question = Some(field.text().await.context("Failed to read question field")?);
            }
            Some("file") => {
                file_bytes = Some(field.bytes().await.context("Failed to read file field")?);
            }
            _ => {}
        }
    }

    let question = question.ok_or_else(|| anyhow!("Missing question field"))?;
    let file_bytes = file_bytes.ok_or_else(|| anyhow!("Missing file field"))?;

    // Spool the upload to disk; removed on the success path before responding
    let upload_path = spool_upload(&file_bytes).await?;

    let xml_document = String::from_utf8_lossy(&file_bytes).to_string();

    let embeddings = EmbeddingClient::new(
        config.ollama_url.clone(),
        config.embedding_model.clone(),
    );

    // The persisted index is opened fresh per request
    let retriever = Retriever::open(&config.index_dir, embeddings, config.search_k)?;
    let retrieved = retriever.retrieve(&question).await?;

    let pipeline = QueryPipeline::new(config);
    let answer = pipeline
        .run(question, retrieved.context, xml_document)
        .await?;

    tokio::fs::remove_file(&upload_path)
        .await
        .with_context(|| format!("Failed to remove upload {}", upload_path.display()))?;

    Ok(answer)
}

async fn spool_upload(bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(UPLOAD_DIR)
        .await
        .context("Failed to create upload directory")?;

    let path = PathBuf::from(UPLOAD_DIR).join(uuid::Uuid::new_v4().to_string());
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write upload {}", path.display()))?;

    Ok(path)
}
