use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Chat,
    Completion,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ModelCallError {
    message: String,
}

impl ModelCallError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for ModelCallError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for ModelCallError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("invalid response from model server: {err}"))
    }
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        mode: GenerationMode,
    ) -> Result<String, ModelCallError>;
}
