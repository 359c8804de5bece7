//! Request bodies of the `/auth` routes.

use serde::{Deserialize, Serialize};

use klink_auth::jwt::IssuedToken;

/// Body of `POST /auth/signup/admin` and `POST /auth/signup/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "passwordConfirm")]
    pub password_confirm: String,
}

/// Body of `POST /auth/login`. Both fields are checked by hand so a missing
/// one yields the login-specific message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Body of `PATCH /auth/reset-password/{token}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
    #[serde(alias = "passwordConfirm")]
    pub password_confirm: String,
}

/// Body of `PATCH /auth/change-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// The current password.
    pub password: String,
    #[serde(alias = "newPassword")]
    pub new_password: String,
    #[serde(alias = "passwordConfirm")]
    pub password_confirm: String,
}

/// A signed-in user: the token to hand out and the user document.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: IssuedToken,
    pub user: serde_json::Value,
}
