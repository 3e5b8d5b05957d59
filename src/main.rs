//! Heartbeat: a standalone health endpoint.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration from a TOML file, builds the health responder, sets up the
//! Axum router and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heartbeat::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use heartbeat::health::HealthResponder;
use heartbeat::server::start_server;
use heartbeat::routes::create_router;

/// Heartbeat: a health endpoint for monitors and load balancers
#[derive(Parser, Debug)]
#[command(name = "heartbeat", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "heartbeat=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration before tracing so the log format is known
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(config = %args.config, "Loaded configuration");

    let health = config.health.clone().into_health_config()?;
    tracing::info!(
        path = %health.path,
        status = %health.status,
        status_code = health.status_code.as_u16(),
        include_env = health.include_env,
        env_keys = ?health.env_keys,
        "Health endpoint configured"
    );

    let responder = HealthResponder::new(health);
    let app = create_router(responder);

    start_server(app, &config.http).await?;

    Ok(())
}
