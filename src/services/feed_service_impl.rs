//! `SeaORM` implementation of the `FeedService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::domain::{FeedScope, Page, PageRequest, UserId};
use crate::models::PostView;
use crate::services::feed_service::{FeedError, FeedService};

pub struct SeaOrmFeedService {
    store: Store,
}

impl SeaOrmFeedService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn fetch(
        &self,
        scope: FeedScope,
        request: PageRequest,
    ) -> Result<Page<PostView>, FeedError> {
        let (items, total) = self
            .store
            .feed_page(scope, request.offset(), request.size())
            .await?;

        Ok(Page::new(items, total, &request))
    }

    async fn ensure_user(&self, user: UserId) -> Result<(), FeedError> {
        if self.store.get_user(user).await?.is_none() {
            return Err(FeedError::UserNotFound(user.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FeedService for SeaOrmFeedService {
    async fn timeline(
        &self,
        user: UserId,
        page: i64,
        per_page: i64,
    ) -> Result<Page<PostView>, FeedError> {
        let request = PageRequest::new(page, per_page)?;
        self.ensure_user(user).await?;
        self.fetch(FeedScope::Timeline(user), request).await
    }

    async fn explore(&self, page: i64, per_page: i64) -> Result<Page<PostView>, FeedError> {
        let request = PageRequest::new(page, per_page)?;
        self.fetch(FeedScope::Explore, request).await
    }

    async fn user_posts(
        &self,
        author: UserId,
        page: i64,
        per_page: i64,
    ) -> Result<Page<PostView>, FeedError> {
        let request = PageRequest::new(page, per_page)?;
        self.ensure_user(author).await?;
        self.fetch(FeedScope::Author(author), request).await
    }
}
