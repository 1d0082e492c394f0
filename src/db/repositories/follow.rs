use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set, SqlErr,
};
use std::collections::BTreeSet;
use tracing::info;

use crate::domain::UserId;
use crate::entities::{followers, prelude::*};
use crate::models::timestamp_now;

/// Repository for follow edges.
///
/// Edges are looked up in two directions: by follower (primary key prefix)
/// and by followed user (`idx_followers_followed_id`).
pub struct FollowRepository {
    conn: DatabaseConnection,
}

impl FollowRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts `follower -> followed`. Returns `false` if the edge already existed.
    pub async fn add(&self, follower: UserId, followed: UserId) -> Result<bool> {
        let existing = Followers::find_by_id((follower.value(), followed.value()))
            .one(&self.conn)
            .await
            .context("Failed to query follow edge")?;

        if existing.is_some() {
            return Ok(false);
        }

        let active = followers::ActiveModel {
            follower_id: Set(follower.value()),
            followed_id: Set(followed.value()),
            created_at: Set(timestamp_now()),
        };

        match Followers::insert(active)
            .exec_without_returning(&self.conn)
            .await
        {
            Ok(_) => {
                info!("User {} now follows {}", follower, followed);
                Ok(true)
            }
            // A concurrent request inserted the same edge first.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(e).context("Failed to insert follow edge"),
        }
    }

    /// Deletes `follower -> followed`. Returns `false` if there was no such edge.
    pub async fn remove(&self, follower: UserId, followed: UserId) -> Result<bool> {
        let result = Followers::delete_many()
            .filter(followers::Column::FollowerId.eq(follower.value()))
            .filter(followers::Column::FollowedId.eq(followed.value()))
            .exec(&self.conn)
            .await
            .context("Failed to delete follow edge")?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("User {} unfollowed {}", follower, followed);
        }
        Ok(removed)
    }

    pub async fn exists(&self, follower: UserId, followed: UserId) -> Result<bool> {
        let count = Followers::find()
            .filter(followers::Column::FollowerId.eq(follower.value()))
            .filter(followers::Column::FollowedId.eq(followed.value()))
            .count(&self.conn)
            .await
            .context("Failed to query follow edge")?;

        Ok(count > 0)
    }

    pub async fn followed_ids(&self, follower: UserId) -> Result<BTreeSet<UserId>> {
        let ids = select_followed_ids(&self.conn, follower)
            .await
            .context("Failed to query followed users")?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }

    pub async fn follower_ids(&self, followed: UserId) -> Result<BTreeSet<UserId>> {
        let ids: Vec<i32> = Followers::find()
            .select_only()
            .column(followers::Column::FollowerId)
            .filter(followers::Column::FollowedId.eq(followed.value()))
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to query followers")?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }

    pub async fn count_followers(&self, followed: UserId) -> Result<u64> {
        let count = Followers::find()
            .filter(followers::Column::FollowedId.eq(followed.value()))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    pub async fn count_following(&self, follower: UserId) -> Result<u64> {
        let count = Followers::find()
            .filter(followers::Column::FollowerId.eq(follower.value()))
            .count(&self.conn)
            .await?;
        Ok(count)
    }
}

/// Ids followed by `follower`, read through any connection or open transaction.
pub(crate) async fn select_followed_ids<C>(db: &C, follower: UserId) -> Result<Vec<i32>, DbErr>
where
    C: ConnectionTrait,
{
    Followers::find()
        .select_only()
        .column(followers::Column::FollowedId)
        .filter(followers::Column::FollowerId.eq(follower.value()))
        .into_tuple()
        .all(db)
        .await
}
