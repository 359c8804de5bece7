//! Route definitions for the K-Link HTTP API.
//!
//! Resource routes are mounted under `/api/v1`. The router receives
//! `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use klink_entity::permission::Permissions;
use klink_entity::product::{Categories, Products};
use klink_entity::role::Roles;
use klink_entity::user::Users;

use crate::error::mask_internal_errors;
use crate::handlers;
use crate::handlers::crud;
use crate::middleware;
use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::rate_limit::RateLimiter;
use crate::state::{AppState, CrudResource};

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;

    let mut api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/auth", auth_routes())
        .nest("/users", resource_routes::<Users>())
        .nest("/roles", resource_routes::<Roles>())
        .nest("/permissions", resource_routes::<Permissions>())
        .nest("/categories", resource_routes::<Categories>())
        .nest("/products", resource_routes::<Products>())
        .nest("/files", file_routes());

    if server.rate_limit.enabled {
        let limiter = RateLimiter::from_config(&server.rate_limit);
        api_routes = api_routes.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit::rate_limit,
        ));
    }

    let mut router = Router::new()
        .route("/", get(handlers::health::root))
        .route("/storage/{*key}", get(handlers::storage::read_object))
        .nest("/api/v1", api_routes)
        .fallback(handlers::health::not_found);

    if state.config.is_production() {
        router = router.layer(axum_middleware::map_response(mask_internal_errors));
    }

    let router = router
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&server.cors))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ));

    middleware::headers::with_security_headers(router).with_state(state)
}

/// Auth endpoints: sign-up, login, logout, password flows, profile
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup/admin", post(handlers::auth::signup_admin))
        .route("/signup/user", post(handlers::auth::signup_user))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password/{token}", patch(handlers::auth::reset_password))
        .route("/me", get(handlers::auth::me))
        .route("/update-me", patch(handlers::auth::update_me))
        .route("/change-password", patch(handlers::auth::change_password))
}

/// List, create, read, update and delete for one resource
fn resource_routes<M: CrudResource>() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list::<M>).post(crud::create::<M>))
        .route(
            "/{id}",
            get(crud::details::<M>)
                .patch(crud::update::<M>)
                .delete(crud::delete::<M>),
        )
}

/// Upload and manage the caller's own files
fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::file::list_files).post(handlers::file::upload_files),
        )
        .route(
            "/{id}",
            get(handlers::file::get_file).delete(handlers::file::delete_file),
        )
}
