//! Account registration, activation and authentication.

use chrono::Duration;
use serde_json::json;
use std::sync::Arc;

use super::token_service::TokenService;
use crate::domain::entities::{IssuedToken, NewUser, TokenScope, User, Versioned};
use crate::domain::repositories::{TokenRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::{PasswordError, hash_password, verify_password};

/// Token lifetimes used by [`UserService`].
#[derive(Debug, Clone, Copy)]
pub struct TokenTtls {
    pub activation: Duration,
    pub authentication: Duration,
}

impl Default for TokenTtls {
    fn default() -> Self {
        Self {
            activation: Duration::days(3),
            authentication: Duration::hours(24),
        }
    }
}

fn password_failure(e: PasswordError) -> AppError {
    AppError::internal("Password processing failed", json!({ "reason": e.to_string() }))
}

/// Runs Argon2 off the async worker threads.
async fn blocking_password<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::internal("Password task failed", json!({ "reason": e.to_string() })))?
        .map_err(password_failure)
}

/// Service for user accounts and their tokens.
pub struct UserService<U: UserRepository, T: TokenRepository> {
    users: Arc<U>,
    tokens: Arc<TokenService<T>>,
    ttls: TokenTtls,
}

impl<U: UserRepository, T: TokenRepository> UserService<U, T> {
    pub fn new(users: Arc<U>, tokens: Arc<TokenService<T>>, ttls: TokenTtls) -> Self {
        Self { users, tokens, ttls }
    }

    /// Creates an inactive account and mints its activation token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] with an `email` detail if the address
    /// is already registered.
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<(User, IssuedToken), AppError> {
        let password_hash = blocking_password(move || hash_password(&password)).await?;

        let user = self
            .users
            .insert(NewUser {
                username,
                email,
                password_hash,
            })
            .await?;

        let token = self
            .tokens
            .issue(user.id, self.ttls.activation, TokenScope::Activation)
            .await?;

        tracing::info!(user_id = user.id, "user registered");
        Ok((user, token))
    }

    /// Activates the account owning `plaintext` and revokes its activation tokens.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the token is malformed, unknown or expired
    /// - [`AppError::EditConflict`] if the account changed concurrently
    pub async fn activate(&self, plaintext: &str) -> Result<User, AppError> {
        let user_id = self
            .tokens
            .validate(TokenScope::Activation, plaintext)
            .await
            .map_err(|e| match e {
                AppError::InvalidToken { .. } => AppError::bad_request(
                    "Failed validation",
                    json!({ "token": "invalid or expired activation token" }),
                ),
                other => other,
            })?;

        let mut user = self.users.fetch(user_id).await?;
        user.activated = true;
        let version = self.users.update(&user).await?;
        user.set_version(version);

        self.tokens
            .revoke_all(TokenScope::Activation, user.id)
            .await?;

        tracing::info!(user_id = user.id, "user activated");
        Ok(user)
    }

    /// Exchanges email and password for an authentication token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCredentials`] for an unknown email or a wrong
    /// password, without saying which.
    pub async fn authenticate(&self, email: &str, password: String) -> Result<IssuedToken, AppError> {
        let user = match self.users.fetch_by_email(email).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => return Err(AppError::invalid_credentials()),
            Err(e) => return Err(e),
        };

        let stored = user.password_hash.clone();
        let matches = blocking_password(move || verify_password(&password, &stored)).await?;
        if !matches {
            return Err(AppError::invalid_credentials());
        }

        self.tokens
            .issue(user.id, self.ttls.authentication, TokenScope::Authentication)
            .await
    }

    /// Resolves a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidToken`] if the token does not validate or its
    /// user is gone, and [`AppError::Validation`] if it is malformed.
    pub async fn user_for_token(&self, plaintext: &str) -> Result<User, AppError> {
        let user_id = self
            .tokens
            .validate(TokenScope::Authentication, plaintext)
            .await?;

        match self.users.fetch(user_id).await {
            Ok(user) => Ok(user),
            Err(e) if e.is_not_found() => Err(AppError::invalid_token()),
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, id: i64) -> Result<User, AppError> {
        self.users.fetch(id).await
    }
}
