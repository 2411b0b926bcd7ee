//! CLI command definitions and dispatch.

pub mod catalog;
pub mod migrate;
pub mod serve;
pub mod user;

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use brainery_auth::password::{PasswordHasher, PasswordValidator};
use brainery_auth::session::SessionManager;
use brainery_core::config::AppConfig;
use brainery_core::error::AppError;
use brainery_database::StoreSet;
use brainery_service::IdentityResolver;

use crate::output::OutputFormat;

/// Brainery administration CLI
#[derive(Debug, Parser)]
#[command(name = "brainery-cli", version, about = "Brainery administration CLI")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (config/{env}.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage identities
    User(user::UserArgs),
    /// Manage the study catalog
    Catalog(catalog::CatalogArgs),
    /// Schema migrations and backend transfers
    Migrate(migrate::MigrateArgs),
    /// Start the HTTP server
    Serve(serve::ServeArgs),
}

impl Cli {
    /// Execute the selected command.
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(&self.config, &self.env)?;
        match &self.command {
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Catalog(args) => catalog::execute(args, &config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, &config, self.format).await,
            Commands::Serve(args) => serve::execute(args, config).await,
        }
    }
}

/// Load configuration from the given file plus the environment overlay.
pub fn load_config(path: &str, env: &str) -> Result<AppConfig, AppError> {
    let base = Path::new(path).with_extension("");
    AppConfig::load_from(&base.to_string_lossy(), env)
}

/// Open the configured store backend.
pub async fn open_stores(config: &AppConfig) -> Result<StoreSet, AppError> {
    StoreSet::open(&config.database).await
}

/// An identity resolver over the given stores, for commands that reuse the
/// password policy and hashing rules.
pub fn identity_resolver(config: &AppConfig, stores: &StoreSet) -> IdentityResolver {
    IdentityResolver::new(
        Arc::clone(&stores.identities),
        Arc::new(PasswordHasher::new()),
        Arc::new(PasswordValidator::new(&config.auth)),
        Arc::new(SessionManager::new(&config.auth, &config.session)),
    )
}
