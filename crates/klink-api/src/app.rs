//! Application builder: wires router, middleware, and state into an Axum app.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tracing::{info, warn};

use klink_core::config::AppConfig;
use klink_core::error::AppError;
use klink_database::DatabasePool;
use klink_database::migration::run_migrations;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the K-Link server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!(
        environment = %config.app.environment,
        "Starting {} server...",
        config.app.name
    );

    // ── Step 1: Database ─────────────────────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        run_migrations(db.pool()).await?;
    }

    // ── Step 2: Storage and mail ─────────────────────────────────
    info!(provider = ?config.storage.provider, "Initializing storage...");
    let storage = klink_storage::build_provider(&config.storage).await?;
    if !storage.health_check().await? {
        warn!(provider = storage.provider_type(), "Storage health check failed");
    }
    let mailer = klink_service::build_mailer(&config.mail)?;

    // ── Step 3: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, db.pool().clone(), Arc::clone(&storage), mailer);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("K-Link server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Server stopped, closing database pool");
    db.close().await;
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
