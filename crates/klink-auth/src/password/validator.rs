//! Password policy enforcement for new passwords.

use klink_core::config::AuthConfig;
use klink_core::error::AppError;

/// Validates new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Checks the length policy and that the confirmation matches.
    pub fn validate(&self, password: &str, confirm: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Invalid input data. Password must be at least {} characters long",
                self.min_length
            )));
        }

        if password != confirm {
            return Err(AppError::validation(
                "Invalid input data. Passwords are not the same",
            ));
        }

        Ok(())
    }
}
