//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token, cookie, and credential policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime in days.
    #[serde(default = "default_jwt_days")]
    pub jwt_expires_in_days: i64,
    /// Lifetime of the `token` cookie in days.
    #[serde(default = "default_cookie_days")]
    pub cookie_expires_in_days: i64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Lifetime of a password reset token in minutes.
    #[serde(default = "default_reset_ttl")]
    pub reset_token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_expires_in_days: default_jwt_days(),
            cookie_expires_in_days: default_cookie_days(),
            password_min_length: default_password_min(),
            reset_token_ttl_minutes: default_reset_ttl(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_days() -> i64 {
    30
}

fn default_cookie_days() -> i64 {
    90
}

fn default_password_min() -> usize {
    8
}

fn default_reset_ttl() -> i64 {
    10
}
