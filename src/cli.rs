use std::{io, path::PathBuf};

use clap::Parser;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    client::{GenerationMode, ModelAdapter, ModelCallError},
    config::{DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_PROJECT},
};

pub const EXIT_SENTINEL: &str = "/exit";
pub const PROMPT_MARKER: &str = "> ";
pub const DEFAULT_MODEL: &str = "cogito:3b";

/// Interact with Ollama models.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "ollama-cli", version, about, long_about = None)]
pub struct CliArgs {
    /// Use chat completion mode (interactive session).
    #[arg(long)]
    pub chat: bool,

    /// Model identifier known to the model server.
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint.
    #[arg(long, env = "OLLAMA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API key sent as bearer token.
    #[arg(long, env = "OLLAMA_API_KEY", default_value = DEFAULT_API_KEY)]
    pub api_key: String,

    /// Project name used for call recording.
    #[arg(long, env = "TRACE_PROJECT", default_value = DEFAULT_PROJECT)]
    pub project: String,

    /// Directory receiving JSONL call traces.
    #[arg(long, env = "TRACE_DIR")]
    pub trace_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Model(#[from] ModelCallError),
}

pub async fn run_chat<R, W>(
    adapter: &ModelAdapter,
    model_id: &str,
    input: R,
    output: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write(output, &format!("Interactive chat mode with {model_id}\n")).await?;
    write(output, "Type your prompts. Type '/exit' to quit.\n").await?;

    let mut lines = input.lines();
    loop {
        write(output, PROMPT_MARKER).await?;
        let Some(prompt) = lines.next_line().await? else {
            break;
        };

        if prompt.trim() == EXIT_SENTINEL {
            write(output, "Exiting...\n").await?;
            break;
        }

        match adapter
            .generate(model_id, &prompt, GenerationMode::Chat)
            .await
        {
            Ok(text) => write(output, &format!("\nResponse:\n{text}\n\n")).await?,
            Err(err) => write(output, &format!("Error: {err}\n")).await?,
        }
    }

    Ok(())
}

pub async fn run_completion<R, W>(
    adapter: &ModelAdapter,
    model_id: &str,
    input: R,
    output: &mut W,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write(output, &format!("Completion mode with {model_id}\n")).await?;
    write(output, "Type your prompt and press Enter:\n").await?;
    write(output, PROMPT_MARKER).await?;

    let prompt = input.lines().next_line().await?.unwrap_or_default();

    match adapter
        .generate(model_id, &prompt, GenerationMode::Completion)
        .await
    {
        Ok(text) => {
            write(output, &format!("\nResponse:\n{text}\n")).await?;
            Ok(())
        }
        Err(err) => {
            write(output, &format!("Error: {err}\n")).await?;
            Err(err.into())
        }
    }
}

async fn write<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}
