//! Sign-up, login, token verification and password flows.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{Value, json};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use klink_auth::jwt::{JwtDecoder, JwtEncoder};
use klink_auth::password::{PasswordHasher, PasswordValidator, ResetToken};
use klink_core::config::AuthConfig;
use klink_core::error::{AppError, ErrorKind};
use klink_core::result::AppResult;
use klink_core::traits::{MailMessage, Mailer};
use klink_core::types::ListQuery;
use klink_database::repositories::{RoleRepository, UserRepository};
use klink_entity::user::{UpdateUser, Users};

use super::dto::{
    AuthSession, ChangePasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest,
};
use crate::context::RequestContext;
use crate::crud::service::{parse_body, to_columns};
use crate::crud::{CrudService, UserWriteHook};

/// Rejection for a request without a token.
pub const NOT_LOGGED_IN: &str = "You are not logged in! Please log in to get access.";
/// Rejection for a token whose user was deleted.
pub const USER_GONE: &str = "The user belonging to this token no longer exists.";
/// Rejection for a token issued before the last password change.
pub const PASSWORD_CHANGED: &str = "User recently changed password! Please log in again.";
const BAD_CREDENTIALS: &str = "Incorrect email or password";
const RESET_SUBJECT: &str = "Your password reset token (valid for 10 minutes)";

/// Authentication use cases.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    roles: RoleRepository,
    user_docs: CrudService<Users>,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    mailer: Arc<dyn Mailer>,
    reset_ttl: Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("mailer", &self.mailer)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(pool: PgPool, config: &AuthConfig, mailer: Arc<dyn Mailer>) -> Self {
        let hasher = PasswordHasher::new();
        let validator = PasswordValidator::new(config);
        let hook = UserWriteHook::new(hasher.clone(), validator.clone());

        Self {
            users: UserRepository::new(pool.clone()),
            roles: RoleRepository::new(pool.clone()),
            user_docs: CrudService::new(pool).with_hook(Arc::new(hook)),
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            hasher,
            validator,
            mailer,
            reset_ttl: Duration::minutes(config.reset_token_ttl_minutes),
        }
    }

    /// The user CRUD service, with password hashing attached.
    pub fn user_documents(&self) -> &CrudService<Users> {
        &self.user_docs
    }

    /// Verify a token and load the user it belongs to, with role permissions.
    pub async fn authenticate(&self, token: Option<&str>) -> AppResult<RequestContext> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized(NOT_LOGGED_IN))?;
        let claims = self.decoder.decode(token)?;

        let user = self
            .users
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::unauthorized(USER_GONE))?;

        if user.changed_password_after(claims.iat) {
            return Err(AppError::unauthorized(PASSWORD_CHANGED));
        }

        let role = match user.role_id {
            Some(role_id) => self.roles.find_by_id(role_id).await?,
            None => None,
        };
        let permissions = match &role {
            Some(role) => self.roles.find_permissions(role).await?,
            None => Vec::new(),
        };

        Ok(RequestContext::new(user, role, permissions))
    }

    /// Create an account with the first role of `role_type`.
    pub async fn signup(&self, role_type: &str, req: SignupRequest) -> AppResult<AuthSession> {
        let role = self
            .roles
            .find_first_by_type(role_type)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!(
                    "No {role_type} role found. Please define a role with \"type: {role_type}\" and try again."
                ))
            })?;

        let body = json!({
            "name": req.name,
            "email": req.email,
            "password": req.password,
            "password_confirm": req.password_confirm,
            "role_id": role.id,
        });
        let user = self.user_docs.create(body, None).await?;
        let user_id = doc_uuid(&user)?;

        info!(user_id = %user_id, role = role_type, "User signed up");
        self.session(user_id, user)
    }

    /// Check credentials and sign a token.
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthSession> {
        let (email, password) = match (req.email, req.password) {
            (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
            _ => return Err(AppError::validation("Please provide email and password")),
        };

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::unauthorized(BAD_CREDENTIALS))?;

        if !self.hasher.verify_password(&password, &user.password_hash)? {
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        }

        info!(user_id = %user.id, "User logged in");
        let doc = self.load_document(user.id).await?;
        self.session(user.id, doc)
    }

    /// Mail a one-time reset token to the account holder.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("There is no user with this email address"))?;

        let token = ResetToken::generate();
        let expires = Utc::now() + self.reset_ttl;
        self.users
            .set_reset_token(user.id, Some((&token.digest, expires)))
            .await?;

        let message = MailMessage {
            to: user.email.clone(),
            to_name: Some(user.name.clone()),
            subject: RESET_SUBJECT.to_string(),
            body: format!(
                "You are receiving this email because you have requested the reset of a password. \
                 Please use the following token to reset your password.\n\nReset Token: {}",
                token.raw
            ),
        };

        if let Err(e) = self.mailer.send(message).await {
            warn!(user_id = %user.id, error = %e, "Reset mail failed, clearing token");
            self.users.set_reset_token(user.id, None).await?;
            return Err(AppError::with_source(
                ErrorKind::ExternalService,
                "Email could not be sent. Please try again later.",
                e,
            ));
        }

        info!(user_id = %user.id, "Password reset token issued");
        Ok(())
    }

    /// Set a new password using a mailed reset token.
    pub async fn reset_password(
        &self,
        raw_token: &str,
        req: ResetPasswordRequest,
    ) -> AppResult<AuthSession> {
        let user = self
            .users
            .find_by_reset_token(&ResetToken::digest(raw_token))
            .await?
            .ok_or_else(|| AppError::validation("Token is invalid or has expired"))?;

        self.store_password(user.id, &req.password, &req.password_confirm)
            .await?;

        info!(user_id = %user.id, "Password reset");
        let doc = self.load_document(user.id).await?;
        self.session(user.id, doc)
    }

    /// The current user's document.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<Value> {
        self.load_document(ctx.user_id()).await
    }

    /// Update the current user's name and email.
    pub async fn update_me(&self, ctx: &RequestContext, body: Value) -> AppResult<Value> {
        if body.get("password").is_some() || body.get("password_confirm").is_some() {
            return Err(AppError::validation(
                "This route is not for password updates. Please use /change-password.",
            ));
        }

        let requested: UpdateUser = parse_body(body)?;
        let allowed = UpdateUser {
            name: requested.name,
            email: requested.email,
            ..UpdateUser::default()
        };
        let body = Value::Object(to_columns(&allowed)?);

        let doc = self.user_docs.update(ctx.user_id(), body).await?;
        info!(user_id = %ctx.user_id(), "Profile updated");
        Ok(doc)
    }

    /// Change the password after checking the current one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        req: ChangePasswordRequest,
    ) -> AppResult<AuthSession> {
        if !self
            .hasher
            .verify_password(&req.password, &ctx.user.password_hash)?
        {
            return Err(AppError::unauthorized("Your current password is wrong"));
        }

        self.store_password(ctx.user_id(), &req.new_password, &req.password_confirm)
            .await?;

        info!(user_id = %ctx.user_id(), "Password changed");
        let doc = self.load_document(ctx.user_id()).await?;
        self.session(ctx.user_id(), doc)
    }

    async fn store_password(&self, user_id: Uuid, password: &str, confirm: &str) -> AppResult<()> {
        self.validator.validate(password, confirm)?;
        let hash = self.hasher.hash_password(password)?;
        // Back-date one second so the token issued right after stays valid.
        let changed_at = Utc::now() - Duration::seconds(1);
        self.users.update_password(user_id, &hash, changed_at).await
    }

    async fn load_document(&self, user_id: Uuid) -> AppResult<Value> {
        self.user_docs.get(user_id, &ListQuery::default()).await
    }

    fn session(&self, user_id: Uuid, user: Value) -> AppResult<AuthSession> {
        Ok(AuthSession {
            token: self.encoder.issue(user_id)?,
            user,
        })
    }
}

fn doc_uuid(doc: &Value) -> AppResult<Uuid> {
    doc.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AppError::internal("Inserted user has no id"))
}
