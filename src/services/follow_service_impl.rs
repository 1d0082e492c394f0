//! `SeaORM` implementation of the `FollowGraph` trait.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::db::Store;
use crate::domain::UserId;
use crate::services::follow_service::{FollowCounts, FollowError, FollowGraph};

pub struct SeaOrmFollowGraph {
    store: Store,
}

impl SeaOrmFollowGraph {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Existence is checked before the self test, so a missing user reports
    /// `NotFound` even when `actor == target`.
    async fn check_pair(&self, actor: UserId, target: UserId) -> Result<(), FollowError> {
        if self.store.get_user(target).await?.is_none() {
            return Err(FollowError::NotFound(target.to_string()));
        }
        if actor != target && self.store.get_user(actor).await?.is_none() {
            return Err(FollowError::NotFound(actor.to_string()));
        }
        if actor == target {
            return Err(FollowError::SelfFollow);
        }
        Ok(())
    }
}

#[async_trait]
impl FollowGraph for SeaOrmFollowGraph {
    async fn follow(&self, actor: UserId, target: UserId) -> Result<bool, FollowError> {
        self.check_pair(actor, target).await?;
        Ok(self.store.add_follow(actor, target).await?)
    }

    async fn unfollow(&self, actor: UserId, target: UserId) -> Result<bool, FollowError> {
        self.check_pair(actor, target).await?;
        Ok(self.store.remove_follow(actor, target).await?)
    }

    async fn is_following(&self, actor: UserId, target: UserId) -> Result<bool, FollowError> {
        Ok(self.store.is_following(actor, target).await?)
    }

    async fn followed_ids(&self, user: UserId) -> Result<BTreeSet<UserId>, FollowError> {
        let mut ids = self.store.followed_ids(user).await?;
        // Self edges cannot be created through this service, but rows written
        // by other tools are not trusted to respect that.
        ids.remove(&user);
        Ok(ids)
    }

    async fn follower_ids(&self, user: UserId) -> Result<BTreeSet<UserId>, FollowError> {
        let mut ids = self.store.follower_ids(user).await?;
        ids.remove(&user);
        Ok(ids)
    }

    async fn counts(&self, user: UserId) -> Result<FollowCounts, FollowError> {
        Ok(FollowCounts {
            followers: self.store.count_followers(user).await?,
            following: self.store.count_following(user).await?,
        })
    }
}
