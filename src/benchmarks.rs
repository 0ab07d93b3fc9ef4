use std::{fs, path::Path};

use serde::{Deserialize, Serialize, Serializer};

use crate::{config::AppConfig, error::ServiceError};

const MISSING_DESCRIPTION: &str = "No description";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Benchmark {
    pub name: String,
    pub description: String,
    pub prompts: Vec<String>,
}

impl Benchmark {
    pub fn new(name: &str, description: &str, prompts: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            prompts: prompts.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkInfo {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkListing(Vec<(String, BenchmarkInfo)>);

impl BenchmarkListing {
    pub fn get(&self, name: &str) -> Option<&BenchmarkInfo> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, info)| info)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for BenchmarkListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, info)| (name, info)))
    }
}

#[derive(Deserialize)]
struct BenchmarkEntry {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    prompts: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BenchmarkRegistry {
    benchmarks: Vec<Benchmark>,
}

impl BenchmarkRegistry {
    pub fn builtin() -> Self {
        Self {
            benchmarks: vec![
                Benchmark::new(
                    "simple_math",
                    "Basic arithmetic questions.",
                    &["What is 5 + 3?", "Calculate 12 * 4.", "What is 100 / 5?"],
                ),
                Benchmark::new(
                    "general_knowledge",
                    "Simple general knowledge questions.",
                    &[
                        "What is the capital of France?",
                        "Who wrote Hamlet?",
                        "What is the chemical symbol for water?",
                    ],
                ),
            ],
        }
    }

    pub fn from_benchmarks(
        benchmarks: impl IntoIterator<Item = Benchmark>,
    ) -> Result<Self, ServiceError> {
        let mut collected: Vec<Benchmark> = Vec::new();
        for benchmark in benchmarks {
            if collected.iter().any(|b| b.name == benchmark.name) {
                return Err(ServiceError::Config(format!(
                    "duplicate benchmark name '{}'",
                    benchmark.name
                )));
            }
            collected.push(benchmark);
        }
        Ok(Self {
            benchmarks: collected,
        })
    }

    /// Loads `[{ "name": "...", "description": "...", "prompts": ["..."] }]`.
    pub fn load_from_path(path: &Path) -> Result<Self, ServiceError> {
        let raw = fs::read_to_string(path)?;
        let entries: Vec<BenchmarkEntry> = serde_json::from_str(&raw)
            .map_err(|e| ServiceError::Config(format!("invalid benchmark file: {e}")))?;

        Self::from_benchmarks(entries.into_iter().map(|entry| Benchmark {
            name: entry.name,
            description: entry
                .description
                .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
            prompts: entry.prompts,
        }))
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        match config.benchmarks_path.as_deref() {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn describe(&self) -> BenchmarkListing {
        BenchmarkListing(
            self.benchmarks
                .iter()
                .map(|b| {
                    (
                        b.name.clone(),
                        BenchmarkInfo {
                            description: b.description.clone(),
                        },
                    )
                })
                .collect(),
        )
    }

    /// Never hands out a benchmark without prompts.
    pub fn get(&self, name: &str) -> Result<&Benchmark, ServiceError> {
        let benchmark = self
            .benchmarks
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| ServiceError::NotFound(format!("Benchmark '{name}' not found.")))?;
        if benchmark.prompts.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "No prompts found for benchmark '{name}'."
            )));
        }
        Ok(benchmark)
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}
