//! Domain service for registration, login and password reset.

use thiserror::Error;

use crate::domain::{TokenError, UserId};
use crate::models::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid reset token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Validation`] for a bad username, email or password pair
    /// - [`AuthError::Conflict`] if the username or email is taken
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        password2: &str,
    ) -> Result<User, AuthError>;

    /// Verifies credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Loads the user behind a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] if the user no longer exists.
    async fn current_user(&self, id: UserId) -> Result<User, AuthError>;

    /// Records activity for a signed-in user.
    async fn touch_last_seen(&self, id: UserId) -> Result<(), AuthError>;

    /// Mails a reset link if `email` belongs to a user. Succeeds either way so
    /// callers cannot probe which addresses are registered.
    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Sets a new password for the user a reset token was issued to.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidToken`] if the token is malformed, forged or expired
    /// - [`AuthError::Validation`] if the passwords are empty or differ
    async fn reset_password(
        &self,
        token: &str,
        password: &str,
        password2: &str,
    ) -> Result<(), AuthError>;
}
