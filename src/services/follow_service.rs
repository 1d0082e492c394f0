//! Domain service for the directed follow graph.
//!
//! Every call reads the store directly; nothing is cached between requests.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::domain::UserId;

/// Errors specific to follow operations.
#[derive(Debug, Error)]
pub enum FollowError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Users cannot follow or unfollow themselves")]
    SelfFollow,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for FollowError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for FollowError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Follower and following totals for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct FollowCounts {
    pub followers: u64,
    pub following: u64,
}

#[async_trait::async_trait]
pub trait FollowGraph: Send + Sync {
    /// Adds the edge `actor -> target`. Idempotent: returns `Ok(false)` if the
    /// edge already existed.
    ///
    /// # Errors
    ///
    /// [`FollowError::NotFound`] if either user does not exist,
    /// [`FollowError::SelfFollow`] if `actor == target`.
    async fn follow(&self, actor: UserId, target: UserId) -> Result<bool, FollowError>;

    /// Removes the edge `actor -> target`. Idempotent: returns `Ok(false)` if
    /// there was no edge.
    ///
    /// # Errors
    ///
    /// Same as [`FollowGraph::follow`].
    async fn unfollow(&self, actor: UserId, target: UserId) -> Result<bool, FollowError>;

    async fn is_following(&self, actor: UserId, target: UserId) -> Result<bool, FollowError>;

    /// Everyone `user` follows. Never contains `user` itself.
    async fn followed_ids(&self, user: UserId) -> Result<BTreeSet<UserId>, FollowError>;

    /// Everyone who follows `user`.
    async fn follower_ids(&self, user: UserId) -> Result<BTreeSet<UserId>, FollowError>;

    async fn counts(&self, user: UserId) -> Result<FollowCounts, FollowError>;
}
