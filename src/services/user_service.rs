//! Domain service for profiles and publishing.

use serde::Serialize;
use thiserror::Error;

use crate::domain::UserId;
use crate::models::{Post, User};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A user's public page as seen by `viewer`.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user: User,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    /// Whether the viewer follows this user. Always false on one's own profile.
    pub is_following: bool,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if no user has this name.
    async fn get_by_username(&self, username: &str) -> Result<User, UserError>;

    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if no user has this name.
    async fn profile(&self, viewer: UserId, username: &str) -> Result<Profile, UserError>;

    /// Changes the username and about-me text.
    ///
    /// # Errors
    ///
    /// - [`UserError::Validation`] for an invalid username or an over-long about-me
    /// - [`UserError::Conflict`] if another user already has the new name
    async fn update_profile(
        &self,
        id: UserId,
        username: &str,
        about_me: &str,
    ) -> Result<User, UserError>;

    /// # Errors
    ///
    /// Returns [`UserError::Validation`] if the trimmed body is empty or too long.
    async fn publish_post(&self, author: UserId, body: &str) -> Result<Post, UserError>;

    /// Users following `username`, sorted by name.
    async fn list_followers(&self, username: &str) -> Result<Vec<User>, UserError>;

    /// Users `username` follows, sorted by name.
    async fn list_following(&self, username: &str) -> Result<Vec<User>, UserError>;
}
