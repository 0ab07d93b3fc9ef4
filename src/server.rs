use std::{io::ErrorKind, path::Path, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::{
    benchmarks::{BenchmarkListing, BenchmarkRegistry},
    client::{GenerationMode, ModelAdapter},
    config::AppConfig,
    error::ServiceError,
    evaluation::{self, EvaluationRequest, EvaluationSummary},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<BenchmarkRegistry>,
    pub adapter: ModelAdapter,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub model_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub model_id: String,
    pub reply: String,
}

pub fn build_router(
    config: Arc<AppConfig>,
    registry: Arc<BenchmarkRegistry>,
    adapter: ModelAdapter,
) -> Router {
    let assets = ServeDir::new(&config.static_dir);
    let state = AppState {
        config,
        registry,
        adapter,
    };

    Router::new()
        .route("/", get(index_page))
        .route("/chat", get(chat_page).post(chat))
        .route("/evaluation", get(evaluation_page))
        .route("/run_evaluation", post(run_evaluation))
        .route("/benchmarks", get(list_benchmarks))
        .route("/health", get(health))
        .nest_service("/static", assets)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServiceError> {
    require_model_id(&request.model_id)?;
    info!(model_id = %request.model_id, "received chat request");

    let reply = state
        .adapter
        .generate(&request.model_id, &request.message, GenerationMode::Chat)
        .await?;

    Ok(Json(ChatResponse {
        model_id: request.model_id,
        reply,
    }))
}

async fn run_evaluation(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<EvaluationSummary>, ServiceError> {
    require_model_id(&request.model_id)?;
    info!(
        model_id = %request.model_id,
        benchmark = %request.benchmark_name,
        "received evaluation request"
    );

    let summary = evaluation::run_evaluation(
        &state.adapter,
        &state.registry,
        &request.model_id,
        &request.benchmark_name,
    )
    .await?;

    Ok(Json(summary))
}

async fn list_benchmarks(State(state): State<AppState>) -> Json<BenchmarkListing> {
    Json(state.registry.describe())
}

async fn index_page(State(state): State<AppState>) -> Result<Html<String>, ServiceError> {
    serve_page(&state.config.static_dir, "index.html").await
}

async fn chat_page(State(state): State<AppState>) -> Result<Html<String>, ServiceError> {
    serve_page(&state.config.static_dir, "chat.html").await
}

async fn evaluation_page(State(state): State<AppState>) -> Result<Html<String>, ServiceError> {
    serve_page(&state.config.static_dir, "evaluation.html").await
}

async fn serve_page(dir: &Path, file: &str) -> Result<Html<String>, ServiceError> {
    let path = dir.join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Ok(Html(body)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            Err(ServiceError::AssetNotFound(path.display().to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

fn require_model_id(model_id: &str) -> Result<(), ServiceError> {
    if model_id.trim().is_empty() {
        return Err(ServiceError::BadRequest("model_id must not be empty".into()));
    }
    Ok(())
}
