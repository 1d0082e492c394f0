use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::follow::select_followed_ids;
use crate::domain::{FeedScope, UserId};
use crate::entities::{posts, prelude::*};
use crate::models::{Post, PostView, timestamp_now};

/// Repository for posts and the feed queries over them.
pub struct PostRepository {
    conn: DatabaseConnection,
}

impl PostRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, author: UserId, body: &str) -> Result<Post> {
        let active = posts::ActiveModel {
            body: Set(body.to_string()),
            timestamp: Set(timestamp_now()),
            user_id: Set(author.value()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert post")?;

        info!("User {} published post {}", author, model.id);
        Ok(Post::from(model))
    }

    pub async fn count_by_author(&self, author: UserId) -> Result<u64> {
        let count = Posts::find()
            .filter(posts::Column::UserId.eq(author.value()))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    /// Fetch one page of a feed, newest first, plus the total number of posts in it.
    ///
    /// Ordering is `timestamp DESC, id DESC`; the id breaks timestamp ties so
    /// the order is total. The follow lookup, the count and the slice all run
    /// in one transaction and therefore see the same snapshot.
    pub async fn feed_page(
        &self,
        scope: FeedScope,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<PostView>, u64)> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open feed transaction")?;

        let mut query = Posts::find();

        match scope {
            FeedScope::Timeline(user) => {
                let mut ids = select_followed_ids(&txn, user).await?;
                ids.push(user.value());
                ids.sort_unstable();
                ids.dedup();
                query = query.filter(posts::Column::UserId.is_in(ids));
            }
            FeedScope::Author(user) => {
                query = query.filter(posts::Column::UserId.eq(user.value()));
            }
            FeedScope::Explore => {}
        }

        let total = query.clone().count(&txn).await?;

        let rows = query
            .order_by_desc(posts::Column::Timestamp)
            .order_by_desc(posts::Column::Id)
            .offset(offset)
            .limit(limit)
            .find_also_related(Users)
            .all(&txn)
            .await?;

        txn.commit().await?;

        debug!(?scope, offset, limit, total, returned = rows.len(), "Feed page fetched");

        let items = rows
            .into_iter()
            .map(|(post, author)| PostView::from_models(post, author))
            .collect();

        Ok((items, total))
    }
}
