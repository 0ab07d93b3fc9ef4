use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1/";
pub const DEFAULT_API_KEY: &str = "ollama";
pub const DEFAULT_PROJECT: &str = "ollama-benchmarking";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub base_url: String,
    pub api_key: String,
    pub static_dir: PathBuf,
    pub benchmarks_path: Option<PathBuf>,
    pub trace_project: String,
    pub trace_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let listen_addr = env::var("SERVER_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".into())
            .parse()
            .unwrap_or_else(|_| SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000));

        let base_url = env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        // Ollama ignores the key, but the OpenAI protocol requires one.
        let api_key = env::var("OLLAMA_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());

        let static_dir =
            PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()));
        let benchmarks_path = env::var("BENCHMARKS_PATH").ok().map(PathBuf::from);

        let trace_project =
            env::var("TRACE_PROJECT").unwrap_or_else(|_| DEFAULT_PROJECT.to_string());
        let trace_dir = env::var("TRACE_DIR").ok().map(PathBuf::from);

        Ok(Self {
            listen_addr,
            base_url,
            api_key,
            static_dir,
            benchmarks_path,
            trace_project,
            trace_dir,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            static_dir: PathBuf::from("static"),
            benchmarks_path: None,
            trace_project: DEFAULT_PROJECT.to_string(),
            trace_dir: None,
        }
    }
}
