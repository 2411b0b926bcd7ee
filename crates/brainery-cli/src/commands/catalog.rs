//! Study catalog commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use brainery_core::config::AppConfig;
use brainery_core::error::AppError;
use brainery_service::{CatalogService, SeedSubject};

use crate::output::{self, OutputFormat};

/// Arguments for catalog commands
#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Upsert subjects and topics from a JSON file
    Seed {
        /// JSON array of `{name, icon?, topics: [{title, description?}]}`
        file: PathBuf,
    },
    /// List subjects
    Subjects,
}

#[derive(Debug, Serialize, Tabled)]
struct SubjectRow {
    id: String,
    name: String,
    icon: String,
}

/// Execute catalog commands
pub async fn execute(
    args: &CatalogArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::open_stores(config).await?;
    let service = CatalogService::new(std::sync::Arc::clone(&stores.catalog));

    let result = match &args.command {
        CatalogCommand::Seed { file } => seed(&service, file, format).await,
        CatalogCommand::Subjects => service.list_subjects().await.map(|subjects| {
            let rows: Vec<SubjectRow> = subjects
                .into_iter()
                .map(|s| SubjectRow {
                    id: s.id.to_string(),
                    name: s.name,
                    icon: s.icon.unwrap_or_default(),
                })
                .collect();
            output::print_list(&rows, format);
        }),
    };

    stores.health.close().await;
    result
}

async fn seed(service: &CatalogService, file: &PathBuf, format: OutputFormat) -> Result<(), AppError> {
    let bytes = tokio::fs::read(file)
        .await
        .map_err(|e| AppError::internal(format!("Failed to read {}: {e}", file.display())))?;
    let subjects: Vec<SeedSubject> = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::validation(format!("Invalid seed file {}: {e}", file.display())))?;

    let report = service.seed(&subjects).await?;
    output::print_report("Catalog seeded", &report, format);
    Ok(())
}
