//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use klink_auth::Authorizer;
use klink_core::config::{AppConfig, StorageProviderKind};
use klink_core::traits::{Mailer, StorageProvider};
use klink_entity::Resource;
use klink_entity::permission::Permissions;
use klink_entity::product::{Categories, Products};
use klink_entity::role::Roles;
use klink_entity::user::Users;
use klink_service::{AuthService, CrudService, FileService};
use klink_storage::UrlSigner;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// Object storage provider
    pub storage: Arc<dyn StorageProvider>,
    /// Verifies `/storage` links when the local provider is active
    pub url_signer: Option<UrlSigner>,

    // ── Auth ─────────────────────────────────────────────────
    /// Sign-up, login and token verification
    pub auth: AuthService,
    /// Role permission checks
    pub authorizer: Authorizer,

    // ── Resources ────────────────────────────────────────────
    /// Role documents
    pub roles: CrudService<Roles>,
    /// Permission documents
    pub permissions: CrudService<Permissions>,
    /// Category documents
    pub categories: CrudService<Categories>,
    /// Product documents
    pub products: CrudService<Products>,
    /// Uploaded files
    pub files: FileService,
}

impl AppState {
    /// Wire every service from configuration and the shared infrastructure.
    pub fn new(
        config: AppConfig,
        db_pool: PgPool,
        storage: Arc<dyn StorageProvider>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let url_signer = match config.storage.provider {
            StorageProviderKind::Local => Some(UrlSigner::new(
                &config.storage.local.signing_secret,
                &config.storage.local.public_base_url,
            )),
            StorageProviderKind::S3 => None,
        };

        let files = FileService::new(
            db_pool.clone(),
            Arc::clone(&storage),
            config.files.clone(),
            Duration::from_secs(config.storage.presign_expiry_seconds),
        );

        Self {
            auth: AuthService::new(db_pool.clone(), &config.auth, mailer),
            authorizer: Authorizer::new(),
            roles: CrudService::new(db_pool.clone()),
            permissions: CrudService::new(db_pool.clone()),
            categories: CrudService::new(db_pool.clone()),
            products: CrudService::new(db_pool.clone()),
            files,
            url_signer,
            storage,
            db_pool,
            config: Arc::new(config),
        }
    }
}

/// Resources served by the generic CRUD handlers.
pub trait CrudResource: Resource + Sized {
    /// The service for this resource.
    fn service(state: &AppState) -> &CrudService<Self>;
}

impl CrudResource for Users {
    fn service(state: &AppState) -> &CrudService<Self> {
        state.auth.user_documents()
    }
}

impl CrudResource for Roles {
    fn service(state: &AppState) -> &CrudService<Self> {
        &state.roles
    }
}

impl CrudResource for Permissions {
    fn service(state: &AppState) -> &CrudService<Self> {
        &state.permissions
    }
}

impl CrudResource for Categories {
    fn service(state: &AppState) -> &CrudService<Self> {
        &state.categories
    }
}

impl CrudResource for Products {
    fn service(state: &AppState) -> &CrudService<Self> {
        &state.products
    }
}
