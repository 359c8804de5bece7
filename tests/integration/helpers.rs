//! Shared test helpers for integration tests.
//!
//! Tests that need Postgres read `KLINK_TEST_DATABASE_URL` and return early
//! when it is unset. The schema is rebuilt and seeded once per test binary;
//! individual tests isolate themselves with unique emails and names.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

use klink_api::{AppState, build_app};
use klink_core::config::AppConfig;
use klink_database::DatabasePool;
use klink_database::migration::reset_database;
use klink_database::seed::{self, RoleSeed};
use klink_entity::permission::CreatePermission;
use klink_service::LogMailer;
use klink_storage::LocalStorageProvider;

/// Environment variable naming the throwaway test database.
pub const DATABASE_ENV: &str = "KLINK_TEST_DATABASE_URL";

static PREPARED: OnceCell<()> = OnceCell::const_new();

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Application config
    pub config: AppConfig,
    /// Root of the local object store
    pub storage_dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a test application, or `None` when no test database is configured.
    pub async fn try_new() -> Option<Self> {
        Self::try_with_config(|_| {}).await
    }

    /// Like [`TestApp::try_new`], with a hook to adjust the config first.
    pub async fn try_with_config(adjust: impl FnOnce(&mut AppConfig)) -> Option<Self> {
        let Ok(url) = std::env::var(DATABASE_ENV) else {
            eprintln!("{DATABASE_ENV} is not set, skipping");
            return None;
        };

        let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");

        let mut config = AppConfig::default();
        config.app.environment = "test".to_string();
        config.database.url = url;
        config.database.max_connections = 5;
        config.database.min_connections = 0;
        config.server.rate_limit.enabled = false;
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.storage.local.root_path = storage_dir.path().to_string_lossy().to_string();
        config.storage.local.signing_secret = "integration-test-signing".to_string();
        adjust(&mut config);

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        PREPARED
            .get_or_init(|| prepare_database(db.pool().clone()))
            .await;

        let storage = Arc::new(
            LocalStorageProvider::new(&config.storage.local)
                .await
                .expect("Failed to init storage"),
        );
        let state = AppState::new(
            config.clone(),
            db.pool().clone(),
            storage,
            Arc::new(LogMailer),
        );

        Some(Self {
            router: build_app(state),
            db_pool: db.into_pool(),
            config,
            storage_dir,
        })
    }

    /// Sign up through `/auth/signup/{kind}` and return the bearer token
    pub async fn signup(&self, kind: &str, email: &str) -> String {
        let response = self
            .request(
                "POST",
                &format!("/api/v1/auth/signup/{kind}"),
                Some(json!({
                    "name": "Test Account",
                    "email": email,
                    "password": "password123",
                    "password_confirm": "password123",
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Signup failed: {:?}",
            response.body
        );
        response.token()
    }

    /// Sign up an administrator with a fresh email
    pub async fn admin_token(&self) -> String {
        self.signup("admin", &unique_email("admin")).await
    }

    /// Sign up a customer with a fresh email
    pub async fn user_token(&self) -> String {
        self.signup("user", &unique_email("user")).await
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let set_cookie = response
            .headers()
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            raw: body_bytes.to_vec(),
            set_cookie,
        }
    }

    /// Create a category as `token` and return its id
    pub async fn create_category(&self, token: &str, name: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/v1/categories",
                Some(json!({ "name": name })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body, `Null` for non-JSON bodies
    pub body: Value,
    /// Raw body bytes
    pub raw: Vec<u8>,
    /// First `Set-Cookie` header
    pub set_cookie: Option<String>,
}

impl TestResponse {
    /// The `token` field of an auth response
    pub fn token(&self) -> String {
        self.body["token"]
            .as_str()
            .expect("No token in response")
            .to_string()
    }

    /// The `data.id` field of a document response
    pub fn id(&self) -> String {
        self.body["data"]["id"]
            .as_str()
            .expect("No id in response")
            .to_string()
    }

    /// The `message` field of an error response
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// An email address no other test uses
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.com", Uuid::new_v4().simple())
}

/// Drop and recreate the schema, then load the bundled seeds.
async fn prepare_database(pool: PgPool) {
    reset_database(&pool)
        .await
        .expect("Failed to reset test database");

    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("seeds");
    let permissions: Vec<CreatePermission> = read_json(&dir.join("permissions.json"));
    let roles: Vec<RoleSeed> = read_json(&dir.join("roles.json"));

    seed::import_permissions(&pool, &permissions)
        .await
        .expect("Failed to seed permissions");
    seed::import_roles(&pool, &roles)
        .await
        .expect("Failed to seed roles");
}

fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> T {
    let raw = std::fs::read_to_string(path).expect("Failed to read seed file");
    serde_json::from_str(&raw).expect("Failed to parse seed file")
}
