//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use klink_core::config::AuthConfig;
use klink_core::error::AppError;

use super::claims::Claims;

/// Returned for any token that fails signature or format checks.
pub const INVALID_TOKEN: &str = "Invalid token. Please log in again!";
/// Returned for a well-formed token past its expiry.
pub const EXPIRED_TOKEN: &str = "Your token has expired! Please log in again.";

/// Verifies session tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized(EXPIRED_TOKEN)
                }
                _ => {
                    tracing::debug!(error = %e, "Rejected token");
                    AppError::unauthorized(INVALID_TOKEN)
                }
            })
    }
}
