//! Auth handlers: sign-up, login, logout, password flows, and profile.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::Value;

use klink_entity::role::model::{ADMIN_ROLE_TYPE, USER_ROLE_TYPE};
use klink_service::auth::{
    AuthSession, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
    SignupRequest,
};

use crate::dto::response::{ApiResponse, MessageResponse, SUCCESS, TokenResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, JsonBody, TOKEN_COOKIE};
use crate::state::AppState;

/// Build the token cookie for a freshly issued token.
fn token_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(state.config.auth.cookie_expires_in_days))
        .secure(state.config.is_production())
        .build()
}

/// `{status, token, data}` plus the `token` cookie.
fn token_response(
    state: &AppState,
    jar: CookieJar,
    status: StatusCode,
    session: AuthSession,
) -> Response {
    let token = session.token.token;
    let jar = jar.add(token_cookie(state, token.clone()));
    let body = TokenResponse {
        status: SUCCESS.to_string(),
        token,
        data: session.user,
    };
    (status, jar, Json(body)).into_response()
}

/// POST /api/v1/auth/signup/admin
pub async fn signup_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<Response, ApiError> {
    let session = state.auth.signup(ADMIN_ROLE_TYPE, req).await?;
    Ok(token_response(&state, jar, StatusCode::CREATED, session))
}

/// POST /api/v1/auth/signup/user
pub async fn signup_user(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<Response, ApiError> {
    let session = state.auth.signup(USER_ROLE_TYPE, req).await?;
    Ok(token_response(&state, jar, StatusCode::CREATED, session))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    let session = state.auth.login(req).await?;
    Ok(token_response(&state, jar, StatusCode::OK, session))
}

/// POST /api/v1/auth/logout
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (jar, Json(MessageResponse::new("Logged out successfully")))
}

/// POST /api/v1/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.auth.forgot_password(&req.email).await?;
    Ok(Json(MessageResponse::new("Token sent to email!")))
}

/// PATCH /api/v1/auth/reset-password/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    jar: CookieJar,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> Result<Response, ApiError> {
    let session = state.auth.reset_password(&token, req).await?;
    Ok(token_response(&state, jar, StatusCode::OK, session))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let user = state.auth.me(auth.context()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PATCH /api/v1/auth/update-me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let user = state.auth.update_me(auth.context(), body).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PATCH /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> Result<Response, ApiError> {
    let session = state.auth.change_password(auth.context(), req).await?;
    Ok(token_response(&state, jar, StatusCode::OK, session))
}
