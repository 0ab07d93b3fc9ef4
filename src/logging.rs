use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const SERVER_FILTER: &str = "info,hyper=warn,axum::rejection=trace";
// Call records are logged at info; keep them visible in the quiet CLI.
pub const CLI_FILTER: &str = "warn,ollama_benchmarking::recorder=info";

pub fn init_tracing(default_filter: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
