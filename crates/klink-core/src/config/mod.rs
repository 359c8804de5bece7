//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files plus a `KLINK__`-prefixed environment overlay. Each sub-module
//! represents a logical configuration section, and every field carries a
//! serde default so a bare environment is enough to boot in development.

pub mod app;
pub mod auth;
pub mod database;
pub mod files;
pub mod logging;
pub mod mail;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{AppSection, CorsConfig, RateLimitConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::files::FilesConfig;
pub use self::logging::LoggingConfig;
pub use self::mail::{MailConfig, MailTls};
pub use self::storage::{LocalStorageConfig, S3StorageConfig, StorageConfig, StorageProviderKind};

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "KLINK";

/// Keys whose environment values are comma-separated lists.
const LIST_KEYS: &[&str] = &[
    "files.allowed_extensions",
    "files.image_extensions",
    "files.resume_extensions",
    "files.cover_letter_extensions",
    "server.cors.allowed_origins",
    "server.cors.allowed_methods",
    "server.cors.allowed_headers",
];

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application identity and environment.
    #[serde(default)]
    pub app: AppSection,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Object storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Upload rules.
    #[serde(default)]
    pub files: FilesConfig,
    /// Outgoing mail settings.
    #[serde(default)]
    pub mail: MailConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default.toml`, then `config/{env}.toml`, then
    /// environment variables such as `KLINK__DATABASE__URL`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let mut environment = config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .try_parsing(true);
        for key in LIST_KEYS {
            environment = environment.with_list_parse_key(key);
        }

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(environment)
            .set_override("app.environment", env)?
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Resolve the environment name from `KLINK_ENV` (default `development`).
    pub fn env_name() -> String {
        std::env::var("KLINK_ENV").unwrap_or_else(|_| "development".to_string())
    }

    /// Whether the application runs in production mode.
    pub fn is_production(&self) -> bool {
        self.app.is_production()
    }
}
