//! K-Link Server: commerce REST API.
//!
//! Main entry point that loads configuration, sets up logging, and starts
//! the server.

use tracing_subscriber::{EnvFilter, fmt};

use klink_core::config::AppConfig;
use klink_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, `config/<KLINK_ENV>.toml`, and `KLINK__*` variables
fn load_configuration() -> Result<AppConfig, AppError> {
    AppConfig::load(&AppConfig::env_name())
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting K-Link v{}", env!("CARGO_PKG_VERSION"));
    klink_api::run_server(config).await?;
    tracing::info!("K-Link server shut down gracefully");
    Ok(())
}
