//! Identity management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use brainery_auth::password::PasswordHasher;
use brainery_core::config::AppConfig;
use brainery_core::error::AppError;
use brainery_core::types::PageRequest;
use brainery_entity::identity::{Identity, Role};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List identities, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Replace an identity's password (prompted, checked against the policy)
    SetPassword {
        email: String,
    },
    /// Grant the admin role
    Promote {
        email: String,
    },
    /// Report whether an email is registered
    Check {
        email: String,
    },
    /// Delete an identity and everything it owns
    Delete {
        email: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    role: String,
    /// `legacy` hashes never verify; the user needs `set-password`.
    password: String,
    created_at: String,
}

impl UserRow {
    fn new(identity: &Identity, hasher: &PasswordHasher) -> Self {
        Self {
            id: identity.id.to_string(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role.to_string(),
            password: if hasher.is_current_format(&identity.password_hash) {
                "argon2".to_string()
            } else {
                "legacy".to_string()
            },
            created_at: identity.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::open_stores(config).await?;
    let result = run(args, config, &stores, format).await;
    stores.health.close().await;
    result
}

async fn run(
    args: &UserArgs,
    config: &AppConfig,
    stores: &brainery_database::StoreSet,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        UserCommand::List { page, per_page } => {
            let listed = stores
                .identities
                .list(&PageRequest::new(*page, *per_page))
                .await?;
            let hasher = PasswordHasher::new();
            let rows: Vec<UserRow> = listed
                .items
                .iter()
                .map(|identity| UserRow::new(identity, &hasher))
                .collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {} of {} ({} identities)",
                    listed.page,
                    listed.total_pages(),
                    listed.total_items
                );
            }
        }
        UserCommand::SetPassword { email } => {
            let password = dialoguer::Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

            super::identity_resolver(config, stores)
                .reset_password(email, &password)
                .await?;
            output::print_success(&format!("Password updated for '{email}'"));
        }
        UserCommand::Promote { email } => {
            let identity = find(stores, email).await?;
            if identity.is_admin() {
                output::print_warning(&format!("'{email}' is already an admin"));
                return Ok(());
            }
            stores.identities.update_role(&identity.id, Role::Admin).await?;
            output::print_success(&format!("'{email}' promoted to admin"));
        }
        UserCommand::Check { email } => {
            let exists = super::identity_resolver(config, stores)
                .email_exists(email)
                .await?;
            if exists {
                output::print_success(&format!("'{email}' is registered"));
            } else {
                output::print_warning(&format!("'{email}' is not registered"));
            }
        }
        UserCommand::Delete { email, force } => {
            let identity = find(stores, email).await?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete '{}' and all of their saved topics and resources?",
                        identity.email
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            stores.identities.delete(&identity.id).await?;
            output::print_success(&format!("'{email}' deleted"));
        }
    }

    Ok(())
}

async fn find(stores: &brainery_database::StoreSet, email: &str) -> Result<Identity, AppError> {
    stores
        .identities
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))
}
