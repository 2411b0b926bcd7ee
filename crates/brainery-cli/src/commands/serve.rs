//! Start the Brainery server.

use clap::Args;

use brainery_core::config::{AppConfig, StoreBackend};
use brainery_core::error::AppError;
use brainery_database::StoreSet;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the store backend
    #[arg(long, value_parser = parse_backend)]
    pub backend: Option<StoreBackend>,
}

fn parse_backend(value: &str) -> Result<StoreBackend, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "relational" => Ok(StoreBackend::Relational),
        "document" => Ok(StoreBackend::Document),
        other => Err(format!("unknown backend '{other}' (expected relational or document)")),
    }
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(backend) = args.backend {
        config.database.backend = backend;
    }
    config.validate()?;

    println!("Starting Brainery server...");
    println!("  Host:    {}", config.server.host);
    println!("  Port:    {}", config.server.port);
    println!("  Backend: {}", config.database.backend);

    let stores = StoreSet::open(&config.database).await?;
    brainery_api::run_server(config, stores).await
}
