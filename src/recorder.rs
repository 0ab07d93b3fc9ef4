use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{GenerationMode, ModelCallError};

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("invalid project name: {0:?}")]
    InvalidProject(String),
    #[error("trace io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("trace encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct CallRecord {
    pub call_name: String,
    pub model_id: String,
    pub mode: GenerationMode,
    pub prompt: String,
    pub output: Option<String>,
    pub error: Option<String>,
    pub latency_ms: u64,
    pub timestamp_ms: u128,
}

impl CallRecord {
    pub fn new(
        call_name: &str,
        model_id: &str,
        prompt: &str,
        mode: GenerationMode,
        outcome: &Result<String, ModelCallError>,
        latency: Duration,
    ) -> Self {
        let (output, error) = match outcome {
            Ok(text) => (Some(text.clone()), None),
            Err(err) => (None, Some(err.to_string())),
        };
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        Self {
            call_name: call_name.to_string(),
            model_id: model_id.to_string(),
            mode,
            prompt: prompt.to_string(),
            output,
            error,
            latency_ms: u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
            timestamp_ms,
        }
    }
}

pub trait CallRecorder: Send + Sync {
    fn record(&self, call: &CallRecord) -> Result<(), RecorderError>;
}

pub struct LogRecorder {
    project: String,
}

impl LogRecorder {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
        }
    }
}

impl CallRecorder for LogRecorder {
    fn record(&self, call: &CallRecord) -> Result<(), RecorderError> {
        info!(
            project = %self.project,
            call = %call.call_name,
            model_id = %call.model_id,
            mode = ?call.mode,
            latency_ms = call.latency_ms,
            failed = call.error.is_some(),
            "model call"
        );
        Ok(())
    }
}

/// Appends one JSON line per call to `<trace_dir>/<project>/calls.jsonl`.
pub struct JsonlRecorder {
    inner: LogRecorder,
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlRecorder {
    pub fn open(project: &str, trace_dir: &Path) -> Result<Self, RecorderError> {
        let dir = trace_dir.join(project);
        fs::create_dir_all(&dir)?;
        let path = dir.join("calls.jsonl");
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            inner: LogRecorder::new(project),
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CallRecorder for JsonlRecorder {
    fn record(&self, call: &CallRecord) -> Result<(), RecorderError> {
        self.inner.record(call)?;
        let mut line = serde_json::to_vec(call)?;
        line.push(b'\n');
        self.file.lock().write_all(&line)?;
        Ok(())
    }
}

pub fn init(project: &str, trace_dir: Option<&Path>) -> Result<Arc<dyn CallRecorder>, RecorderError> {
    let trimmed = project.trim();
    if trimmed.is_empty() || trimmed.contains(['/', '\\']) || trimmed.starts_with('.') {
        return Err(RecorderError::InvalidProject(project.to_string()));
    }

    match trace_dir {
        Some(dir) => {
            let recorder = JsonlRecorder::open(trimmed, dir)?;
            info!(project = trimmed, path = %recorder.path().display(), "recording model calls");
            Ok(Arc::new(recorder))
        }
        None => Ok(Arc::new(LogRecorder::new(trimmed))),
    }
}

pub fn init_or_log_only(project: &str, trace_dir: Option<&Path>) -> Arc<dyn CallRecorder> {
    match init(project, trace_dir) {
        Ok(recorder) => recorder,
        Err(err) => {
            warn!(project, error = %err, "failed to initialize call recording");
            Arc::new(LogRecorder::new(project))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(outcome: Result<String, ModelCallError>) -> CallRecord {
        CallRecord::new(
            "call_ollama",
            "cogito:3b",
            "What is 5 + 3?",
            GenerationMode::Chat,
            &outcome,
            Duration::from_millis(42),
        )
    }

    #[test]
    fn record_captures_output_or_error() {
        let ok = sample(Ok("8".into()));
        assert_eq!(ok.output.as_deref(), Some("8"));
        assert!(ok.error.is_none());
        assert_eq!(ok.latency_ms, 42);

        let failed = sample(Err(ModelCallError::new("connection refused")));
        assert!(failed.output.is_none());
        assert_eq!(failed.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn jsonl_recorder_appends_one_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = init("bench", Some(dir.path())).unwrap();

        recorder.record(&sample(Ok("8".into()))).unwrap();
        recorder
            .record(&sample(Err(ModelCallError::new("boom"))))
            .unwrap();

        let raw = fs::read_to_string(dir.path().join("bench").join("calls.jsonl")).unwrap();
        let lines: Vec<serde_json::Value> = raw
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["output"], "8");
        assert_eq!(lines[0]["mode"], "chat");
        assert_eq!(lines[1]["error"], "boom");
    }

    #[test]
    fn init_rejects_bad_project_names() {
        assert!(matches!(
            init("  ", None),
            Err(RecorderError::InvalidProject(_))
        ));
        assert!(matches!(
            init("../escape", None),
            Err(RecorderError::InvalidProject(_))
        ));
    }

    #[test]
    fn init_or_log_only_survives_unusable_trace_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let recorder = init_or_log_only("bench", Some(&blocker));
        assert!(recorder.record(&sample(Ok("ok".into()))).is_ok());
    }
}
