use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    benchmarks::BenchmarkRegistry,
    client::{GenerationMode, ModelAdapter},
    error::ServiceError,
};

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub model_id: String,
    pub benchmark_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub prompt: String,
    pub response: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EvaluationStatus {
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationSummary {
    pub model_id: String,
    pub benchmark_name: String,
    pub status: EvaluationStatus,
    pub results: Vec<EvaluationResult>,
}

/// Runs every prompt of `benchmark_name` against `model_id`, one after the
/// other, in benchmark order. The first failed model call aborts the run.
pub async fn run_evaluation(
    adapter: &ModelAdapter,
    registry: &BenchmarkRegistry,
    model_id: &str,
    benchmark_name: &str,
) -> Result<EvaluationSummary, ServiceError> {
    let benchmark = registry.get(benchmark_name)?;

    info!(
        model_id,
        benchmark = benchmark_name,
        count = benchmark.prompts.len(),
        "running evaluation benchmark"
    );

    let mut results = Vec::with_capacity(benchmark.prompts.len());
    for prompt in &benchmark.prompts {
        info!(prompt = %preview(prompt), "evaluating prompt");
        let response = adapter
            .generate(model_id, prompt, GenerationMode::Chat)
            .await?;
        results.push(EvaluationResult {
            prompt: prompt.clone(),
            response,
        });
    }

    Ok(EvaluationSummary {
        model_id: model_id.to_string(),
        benchmark_name: benchmark_name.to_string(),
        status: EvaluationStatus::Completed,
        results,
    })
}

fn preview(prompt: &str) -> String {
    const LIMIT: usize = 50;
    let end = prompt
        .char_indices()
        .nth(LIMIT)
        .map(|(idx, _)| idx)
        .unwrap_or(prompt.len());
    format!("'{}...'", &prompt[..end])
}
