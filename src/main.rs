//! Insight Agent: text metrics over HTTP.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration, builds the Axum router and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use insight_agent::config::{AppConfig, LoggingConfig, DEFAULT_LOG_FILTER};
use insight_agent::create_router;
use insight_agent::http::start_server;

/// Insight Agent: word and character counts over HTTP
#[derive(Parser, Debug)]
#[command(name = "insight-agent", version, about)]
struct Args {
    /// Path to configuration file (default: config/default.toml if present)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "insight_agent=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(log_filter: &str, logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(log_filter);
    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration first, the log format depends on it
    let config = AppConfig::load_or_default(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    tracing::info!(
        host = %config.http.host,
        port = config.http.port,
        max_body_bytes = config.analyze.max_body_bytes,
        request_timeout_secs = config.http.request_timeout_seconds,
        "Loaded configuration"
    );

    let app = create_router(&config);
    start_server(app, &config).await?;

    Ok(())
}
