//! CLI command definitions and dispatch.

pub mod migrate;
pub mod role;
pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use klink_core::config::AppConfig;
use klink_core::error::AppError;

/// K-Link: commerce API administration
#[derive(Debug, Parser)]
#[command(name = "klink", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (`config/<env>.toml`); defaults to `KLINK_ENV`
    #[arg(short, long, global = true)]
    pub config_env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the K-Link server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Import or delete permission and role seeds
    Seed(seed::SeedArgs),
    /// Inspect roles
    Role(role::RoleArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Seed(args) => seed::execute(args, &config).await,
            Commands::Role(args) => role::execute(args, &config, self.format).await,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        let env = self
            .config_env
            .clone()
            .unwrap_or_else(AppConfig::env_name);
        tracing::debug!(environment = %env, "Loading configuration");
        AppConfig::load(&env)
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = klink_database::DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_import() {
        let cli = Cli::try_parse_from(["klink", "--config-env", "test", "seed", "import", "--all"])
            .unwrap();
        assert_eq!(cli.config_env.as_deref(), Some("test"));
        assert!(matches!(cli.command, Commands::Seed(_)));
    }
}
