//! Brainery server: study topics, saved summaries, and personal resources
//! behind identity and ownership checks.
//!
//! Main entry point that loads configuration, opens the store backend, and
//! starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use brainery_core::config::AppConfig;
use brainery_core::error::AppError;
use brainery_database::StoreSet;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e.log_detail(), "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `BRAINERY_ENV` overlay, and environment
/// variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("BRAINERY_ENV").unwrap_or_else(|_| "development".to_string());
    let base = std::env::var("BRAINERY_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    AppConfig::load_from(base.trim_end_matches(".toml"), &env)
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

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Brainery v{}", env!("CARGO_PKG_VERSION"));

    if let Some(dir) = data_directory(&config) {
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create {dir}: {e}")))?;
    }

    let stores = StoreSet::open(&config.database).await?;
    brainery_api::run_server(config, stores).await
}

/// Directory the configured backend writes into, if it is file based.
fn data_directory(config: &AppConfig) -> Option<String> {
    use brainery_core::config::StoreBackend;

    let file = match config.database.backend {
        StoreBackend::Relational if !config.database.is_in_memory() => config
            .database
            .url
            .trim_start_matches("sqlite://")
            .split('?')
            .next()
            .map(str::to_string),
        StoreBackend::Relational => None,
        StoreBackend::Document => config.database.document_path.clone(),
    }?;
    std::path::Path::new(&file)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .filter(|p| !p.is_empty())
}
