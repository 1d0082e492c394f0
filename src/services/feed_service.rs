//! Domain service that assembles paginated feeds.

use thiserror::Error;

use crate::domain::{Page, PaginationError, UserId};
use crate::models::PostView;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PaginationError> for FeedError {
    fn from(err: PaginationError) -> Self {
        match err {
            PaginationError::InvalidArgument(msg) => Self::InvalidArgument(msg),
        }
    }
}

impl From<sea_orm::DbErr> for FeedError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for FeedError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Newest-first post feeds. `page` is 1-indexed.
///
/// # Examples
///
/// ```rust,ignore
/// use microblog::services::{FeedError, FeedService};
/// use microblog::domain::UserId;
///
/// async fn first_page(feed: &dyn FeedService, me: UserId) -> Result<(), FeedError> {
///     let page = feed.timeline(me, 1, 25).await?;
///     for post in page.items {
///         println!("{}: {}", post.author, post.body);
///     }
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait FeedService: Send + Sync {
    /// Posts by `user` and by everyone `user` follows.
    ///
    /// # Errors
    ///
    /// - [`FeedError::InvalidArgument`] if `page < 1` or `per_page < 1`
    /// - [`FeedError::UserNotFound`] if `user` does not exist
    async fn timeline(
        &self,
        user: UserId,
        page: i64,
        per_page: i64,
    ) -> Result<Page<PostView>, FeedError>;

    /// Posts by every user.
    ///
    /// # Errors
    ///
    /// [`FeedError::InvalidArgument`] if `page < 1` or `per_page < 1`.
    async fn explore(&self, page: i64, per_page: i64) -> Result<Page<PostView>, FeedError>;

    /// Posts by a single author.
    ///
    /// # Errors
    ///
    /// Same as [`FeedService::timeline`].
    async fn user_posts(
        &self,
        author: UserId,
        page: i64,
        per_page: i64,
    ) -> Result<Page<PostView>, FeedError>;
}
