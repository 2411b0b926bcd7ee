//! Schema migrations and backend transfers.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use brainery_core::config::{AppConfig, StoreBackend};
use brainery_core::error::AppError;
use brainery_database::document::DocumentDatabase;
use brainery_database::{StoreSet, transfer};

use crate::output::{self, OutputFormat};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Apply pending relational schema migrations
    Run,
    /// Copy a document snapshot into the configured relational database
    DocumentsToRelational {
        /// Snapshot file; defaults to `database.document_path`
        #[arg(long)]
        source: Option<PathBuf>,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut relational = config.database.clone();
    relational.backend = StoreBackend::Relational;

    match &args.command {
        MigrateCommand::Run => {
            let stores = StoreSet::open(&relational).await?;
            stores.health.close().await;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::DocumentsToRelational { source, force } => {
            let source = source
                .clone()
                .or_else(|| config.database.document_path.as_ref().map(PathBuf::from))
                .ok_or_else(|| {
                    AppError::validation("No snapshot given and database.document_path is unset")
                })?;
            if !source.exists() {
                return Err(AppError::not_found(format!(
                    "Snapshot {} does not exist",
                    source.display()
                )));
            }

            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Copy {} into {}?",
                        source.display(),
                        relational.url
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let documents = StoreSet::document(DocumentDatabase::open(&source).await?);
            let target = StoreSet::open(&relational).await?;
            let result = transfer(&documents, &target).await;
            target.health.close().await;

            let report = result?;
            output::print_report("Transfer complete", &report, format);
            if report.identities_skipped > 0 {
                output::print_warning(&format!(
                    "{} identities already existed and were left unchanged",
                    report.identities_skipped
                ));
            }
        }
    }

    Ok(())
}
