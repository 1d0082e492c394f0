//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::{Store, UniqueViolation};
use crate::domain::UserId;
use crate::models::{Post, User};
use crate::services::user_service::{Profile, UserError, UserService};
use crate::services::validation;

pub struct SeaOrmUserService {
    store: Store,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn get_by_username(&self, username: &str) -> Result<User, UserError> {
        self.store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| UserError::NotFound(username.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.list_users().await?)
    }

    async fn profile(&self, viewer: UserId, username: &str) -> Result<Profile, UserError> {
        let user = self.get_by_username(username).await?;

        let is_following = viewer != user.id && self.store.is_following(viewer, user.id).await?;

        Ok(Profile {
            followers: self.store.count_followers(user.id).await?,
            following: self.store.count_following(user.id).await?,
            posts: self.store.count_posts_by_author(user.id).await?,
            is_following,
            user,
        })
    }

    async fn update_profile(
        &self,
        id: UserId,
        username: &str,
        about_me: &str,
    ) -> Result<User, UserError> {
        let username = validation::validate_username(username).map_err(UserError::Validation)?;
        let about_me = validation::validate_about_me(about_me).map_err(UserError::Validation)?;

        if let Some(existing) = self.store.get_user_by_username(username).await?
            && existing.id != id
        {
            return Err(UserError::Conflict(
                "Please use a different username".to_string(),
            ));
        }

        if self.store.get_user(id).await?.is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }

        let user = self
            .store
            .update_user_profile(id, username, about_me)
            .await
            .map_err(|e| match UniqueViolation::find(&e) {
                Some(_) => UserError::Conflict("Please use a different username".to_string()),
                None => e.into(),
            })?;
        info!("User {} updated their profile", user.id);
        Ok(user)
    }

    async fn publish_post(&self, author: UserId, body: &str) -> Result<Post, UserError> {
        let body = validation::validate_post_body(body).map_err(UserError::Validation)?;

        if self.store.get_user(author).await?.is_none() {
            return Err(UserError::NotFound(author.to_string()));
        }

        Ok(self.store.create_post(author, body).await?)
    }

    async fn list_followers(&self, username: &str) -> Result<Vec<User>, UserError> {
        let user = self.get_by_username(username).await?;
        let ids: Vec<UserId> = self.store.follower_ids(user.id).await?.into_iter().collect();
        Ok(self.store.get_users_by_ids(&ids).await?)
    }

    async fn list_following(&self, username: &str) -> Result<Vec<User>, UserError> {
        let user = self.get_by_username(username).await?;
        let ids: Vec<UserId> = self.store.followed_ids(user.id).await?.into_iter().collect();
        Ok(self.store.get_users_by_ids(&ids).await?)
    }
}
