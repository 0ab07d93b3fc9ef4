use std::sync::Arc;

use tokio::net::TcpListener;

use ollama_benchmarking::{
    AppConfig, BenchmarkRegistry, ModelAdapter, OpenAiClient, build_router,
    logging::{SERVER_FILTER, init_tracing},
    recorder,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing(SERVER_FILTER);

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(base_url = %config.base_url, "using model server");

    let recorder = recorder::init_or_log_only(&config.trace_project, config.trace_dir.as_deref());
    let registry = Arc::new(BenchmarkRegistry::from_config(config.as_ref())?);
    tracing::info!(count = registry.len(), "benchmarks loaded");

    let client = Arc::new(OpenAiClient::new(&config.base_url, &config.api_key));
    let adapter = ModelAdapter::new(client, recorder);
    let router = build_router(config.clone(), registry, adapter);

    let listener = TcpListener::bind(config.listen_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "REST server ready");

    axum::serve(listener, router).await?;

    Ok(())
}
