pub mod benchmarks;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod logging;
pub mod recorder;
pub mod server;

pub use benchmarks::{Benchmark, BenchmarkRegistry};
pub use client::{GenerationMode, ModelAdapter, ModelCallError, ModelClient, OpenAiClient};
pub use config::AppConfig;
pub use error::ServiceError;
pub use evaluation::{EvaluationResult, EvaluationStatus, EvaluationSummary, run_evaluation};
pub use server::build_router;
