//! Per-resource adjustments applied to a validated body before it is written.

use serde_json::{Map, Value};

use klink_auth::password::{PasswordHasher, PasswordValidator};
use klink_core::result::AppResult;

/// Rewrites the column map produced from a create or update DTO.
pub trait WriteHook: Send + Sync + std::fmt::Debug + 'static {
    /// Called before an insert.
    fn before_create(&self, _values: &mut Map<String, Value>) -> AppResult<()> {
        Ok(())
    }

    /// Called before an update.
    fn before_update(&self, _values: &mut Map<String, Value>) -> AppResult<()> {
        Ok(())
    }
}

/// Resources written as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHook;

impl WriteHook for NoHook {}

/// Hashes the password of new users and keeps emails lowercase.
#[derive(Debug, Clone)]
pub struct UserWriteHook {
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

impl UserWriteHook {
    /// Creates the hook.
    pub fn new(hasher: PasswordHasher, validator: PasswordValidator) -> Self {
        Self { hasher, validator }
    }
}

fn lowercase_email(values: &mut Map<String, Value>) {
    if let Some(Value::String(email)) = values.get_mut("email") {
        *email = email.trim().to_lowercase();
    }
}

impl WriteHook for UserWriteHook {
    fn before_create(&self, values: &mut Map<String, Value>) -> AppResult<()> {
        lowercase_email(values);

        let password = take_string(values, "password");
        let confirm = take_string(values, "password_confirm");
        self.validator.validate(&password, &confirm)?;

        let hash = self.hasher.hash_password(&password)?;
        values.insert("password_hash".into(), Value::String(hash));
        Ok(())
    }

    fn before_update(&self, values: &mut Map<String, Value>) -> AppResult<()> {
        lowercase_email(values);
        Ok(())
    }
}

fn take_string(values: &mut Map<String, Value>, key: &str) -> String {
    match values.remove(key) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use klink_core::config::AuthConfig;
    use serde_json::json;

    fn hook() -> UserWriteHook {
        UserWriteHook::new(
            PasswordHasher::new(),
            PasswordValidator::new(&AuthConfig::default()),
        )
    }

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_create_hashes_password() {
        let mut values = map(json!({
            "name": "Ada",
            "email": " Ada@Example.COM ",
            "password": "pass1234",
            "password_confirm": "pass1234",
        }));
        hook().before_create(&mut values).unwrap();

        assert_eq!(values["email"], "ada@example.com");
        assert!(!values.contains_key("password"));
        assert!(!values.contains_key("password_confirm"));
        let hash = values["password_hash"].as_str().unwrap();
        assert!(PasswordHasher::new().verify_password("pass1234", hash).unwrap());
    }

    #[test]
    fn test_create_enforces_length() {
        let mut values = map(json!({
            "email": "a@b.co",
            "password": "short",
            "password_confirm": "short",
        }));
        assert!(hook().before_create(&mut values).is_err());
    }

    #[test]
    fn test_update_lowercases_email() {
        let mut values = map(json!({ "email": "ME@X.IO" }));
        hook().before_update(&mut values).unwrap();
        assert_eq!(values["email"], "me@x.io");
    }
}
