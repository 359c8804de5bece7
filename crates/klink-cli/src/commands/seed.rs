//! Import or delete the permission and role seed sets.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use serde::de::DeserializeOwned;

use crate::output;
use klink_core::config::AppConfig;
use klink_core::error::AppError;
use klink_database::seed::{self, RoleSeed};
use klink_entity::permission::CreatePermission;

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Seed subcommand
    #[command(subcommand)]
    pub command: SeedCommand,
}

/// Which seed sets to act on
#[derive(Debug, Clone, Copy, Args)]
#[group(required = true, multiple = true)]
pub struct SeedSelection {
    /// Permissions (`permissions.json`)
    #[arg(long)]
    pub permissions: bool,
    /// Roles (`roles.json`)
    #[arg(long)]
    pub roles: bool,
    /// Both permissions and roles
    #[arg(long)]
    pub all: bool,
}

impl SeedSelection {
    fn permissions(&self) -> bool {
        self.all || self.permissions
    }

    fn roles(&self) -> bool {
        self.all || self.roles
    }
}

/// Seed subcommands
#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Load seed files into the database
    Import {
        #[command(flatten)]
        selection: SeedSelection,
        /// Directory holding the seed files
        #[arg(long, default_value = "seeds")]
        dir: PathBuf,
    },
    /// Delete seeded rows
    Delete {
        #[command(flatten)]
        selection: SeedSelection,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Read and parse one JSON seed file.
fn read_seed<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>, AppError> {
    let path = dir.join(file);
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| AppError::configuration(format!("Cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::validation(format!("Invalid seed file {}: {}", path.display(), e)))
}

/// Execute seed commands
pub async fn execute(args: &SeedArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        SeedCommand::Import { selection, dir } => {
            // Parse everything before touching the database.
            let permissions = if selection.permissions() {
                Some(read_seed::<CreatePermission>(dir, "permissions.json")?)
            } else {
                None
            };
            let roles = if selection.roles() {
                Some(read_seed::<RoleSeed>(dir, "roles.json")?)
            } else {
                None
            };

            let pool = super::create_db_pool(config).await?;
            if let Some(permissions) = permissions {
                let count = seed::import_permissions(&pool, &permissions).await?;
                output::print_success(&format!("Imported {} permissions.", count));
            }
            if let Some(roles) = roles {
                let count = seed::import_roles(&pool, &roles).await?;
                output::print_success(&format!("Imported {} roles.", count));
            }
            pool.close().await;
        }
        SeedCommand::Delete { selection, force } => {
            if !output::confirm("This will delete seeded rows. Continue?", *force)? {
                println!("Cancelled.");
                return Ok(());
            }

            let pool = super::create_db_pool(config).await?;
            // Roles reference permissions, so they go first.
            if selection.roles() {
                let count = seed::delete_roles(&pool).await?;
                output::print_success(&format!("Deleted {} roles.", count));
            }
            if selection.permissions() {
                let count = seed::delete_permissions(&pool).await?;
                output::print_success(&format!("Deleted {} permissions.", count));
            }
            pool.close().await;
        }
    }

    Ok(())
}
