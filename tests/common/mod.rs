#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use ollama_benchmarking::{
    GenerationMode, ModelAdapter, ModelCallError, ModelClient,
    recorder::{CallRecord, CallRecorder, RecorderError},
};

/// Answers every prompt with a fixed reply, optionally failing on the n-th
/// call (1-based), and remembers what it was asked.
pub struct ScriptedClient {
    reply: String,
    fail_on: Option<usize>,
    calls: Mutex<Vec<(String, String, GenerationMode)>>,
}

impl ScriptedClient {
    pub fn answering(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_on(call: usize) -> Arc<Self> {
        Arc::new(Self {
            reply: "OK".to_string(),
            fail_on: Some(call),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, String, GenerationMode)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        mode: GenerationMode,
    ) -> Result<String, ModelCallError> {
        let count = {
            let mut calls = self.calls.lock();
            calls.push((model_id.to_string(), prompt.to_string(), mode));
            calls.len()
        };
        if self.fail_on == Some(count) {
            return Err(ModelCallError::new("connection refused"));
        }
        Ok(self.reply.clone())
    }
}

pub struct NullRecorder;

impl CallRecorder for NullRecorder {
    fn record(&self, _call: &CallRecord) -> Result<(), RecorderError> {
        Ok(())
    }
}

pub fn adapter_for(client: Arc<ScriptedClient>) -> ModelAdapter {
    ModelAdapter::new(client, Arc::new(NullRecorder))
}
