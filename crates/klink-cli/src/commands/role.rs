//! Role inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use klink_core::config::AppConfig;
use klink_core::error::AppError;
use klink_database::repositories::RoleRepository;

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// Role subcommands
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// List all roles
    List,
}

/// Role display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    role_type: String,
    permissions: usize,
    description: String,
}

/// Execute role commands
pub async fn execute(
    args: &RoleArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    match &args.command {
        RoleCommand::List => {
            let rows: Vec<RoleRow> = RoleRepository::new(pool.clone())
                .find_all()
                .await?
                .into_iter()
                .map(|r| RoleRow {
                    id: r.id.to_string(),
                    name: r.name,
                    role_type: r.role_type,
                    permissions: r.permission_ids.len(),
                    description: r.description,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    pool.close().await;
    Ok(())
}
