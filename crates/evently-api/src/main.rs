//! Evently API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p evently-api
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use evently_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load .env before reading LOG_FORMAT / RUST_LOG
    let _ = dotenvy::dotenv();

    if let Err(e) = try_init_tracing_with_config(TracingConfig::from_env()) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Evently API Server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.api.port,
        session_store = ?config.session.store,
        "Configuration loaded"
    );

    evently_api::run(config).await?;

    Ok(())
}
