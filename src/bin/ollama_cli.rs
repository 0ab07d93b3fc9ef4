use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;

use ollama_benchmarking::{
    ModelAdapter, OpenAiClient,
    cli::{self, CliArgs, CliError},
    logging::{CLI_FILTER, init_tracing},
    recorder,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_tracing(CLI_FILTER);

    let recorder = recorder::init_or_log_only(&args.project, args.trace_dir.as_deref());
    let client = Arc::new(OpenAiClient::new(&args.base_url, &args.api_key));
    let adapter = ModelAdapter::new(client, recorder);

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    if args.chat {
        cli::run_chat(&adapter, &args.model, input, &mut output).await?;
        return Ok(());
    }

    match cli::run_completion(&adapter, &args.model, input, &mut output).await {
        Ok(()) => Ok(()),
        Err(CliError::Model(_)) => std::process::exit(1),
        Err(err) => Err(err.into()),
    }
}
