use std::{sync::Arc, time::Instant};

use tracing::{error, warn};

use crate::recorder::{CallRecord, CallRecorder};

use super::types::{GenerationMode, ModelCallError, ModelClient};

pub const CALL_NAME: &str = "call_ollama";

#[derive(Clone)]
pub struct ModelAdapter {
    client: Arc<dyn ModelClient>,
    recorder: Arc<dyn CallRecorder>,
}

impl ModelAdapter {
    pub fn new(client: Arc<dyn ModelClient>, recorder: Arc<dyn CallRecorder>) -> Self {
        Self { client, recorder }
    }

    pub async fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        mode: GenerationMode,
    ) -> Result<String, ModelCallError> {
        let start = Instant::now();
        let outcome = self.client.generate(model_id, prompt, mode).await;
        let elapsed = start.elapsed();

        if let Err(err) = &outcome {
            error!(model_id, error = %err, "error calling model");
        }

        let record = CallRecord::new(CALL_NAME, model_id, prompt, mode, &outcome, elapsed);
        if let Err(err) = self.recorder.record(&record) {
            warn!(model_id, error = %err, "failed to record model call");
        }

        outcome
    }
}
