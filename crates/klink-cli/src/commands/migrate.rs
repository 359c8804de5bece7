//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use klink_core::config::AppConfig;
use klink_core::error::AppError;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Reset database (drop the schema and re-run migrations)
    Reset {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            klink_database::migration::run_migrations(&pool).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Reset { force } => {
            if !output::confirm(
                "This will DROP all tables and re-run migrations. Continue?",
                *force,
            )? {
                println!("Cancelled.");
                return Ok(());
            }

            println!("Resetting database...");
            klink_database::migration::reset_database(&pool).await?;
            output::print_success("Database reset complete.");
        }
    }

    pool.close().await;
    Ok(())
}
