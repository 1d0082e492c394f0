use crate::config::SecurityConfig;
use crate::domain::{FeedScope, UserId};
use crate::models::{Post, PostView, User};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::follow::FollowRepository;
pub use repositories::post::PostRepository;
pub use repositories::UniqueViolation;
pub use repositories::user::{UserRepository, hash_password};

/// Handle to the persistence layer. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> UserRepository {
        UserRepository::new(self.conn.clone())
    }

    fn post_repo(&self) -> PostRepository {
        PostRepository::new(self.conn.clone())
    }

    fn follow_repo(&self) -> FollowRepository {
        FollowRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(username, email, password, security)
            .await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>> {
        self.user_repo().get_by_ids(ids).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(
        &self,
        id: UserId,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, security)
            .await
    }

    pub async fn update_user_profile(
        &self,
        id: UserId,
        username: &str,
        about_me: Option<&str>,
    ) -> Result<User> {
        self.user_repo()
            .update_profile(id, username, about_me)
            .await
    }

    pub async fn touch_last_seen(&self, id: UserId) -> Result<()> {
        self.user_repo().touch_last_seen(id).await
    }

    // ========================================================================
    // Posts
    // ========================================================================

    pub async fn create_post(&self, author: UserId, body: &str) -> Result<Post> {
        self.post_repo().create(author, body).await
    }

    pub async fn count_posts_by_author(&self, author: UserId) -> Result<u64> {
        self.post_repo().count_by_author(author).await
    }

    pub async fn feed_page(
        &self,
        scope: FeedScope,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<PostView>, u64)> {
        self.post_repo().feed_page(scope, offset, limit).await
    }

    // ========================================================================
    // Follow edges
    // ========================================================================

    pub async fn add_follow(&self, follower: UserId, followed: UserId) -> Result<bool> {
        self.follow_repo().add(follower, followed).await
    }

    pub async fn remove_follow(&self, follower: UserId, followed: UserId) -> Result<bool> {
        self.follow_repo().remove(follower, followed).await
    }

    pub async fn is_following(&self, follower: UserId, followed: UserId) -> Result<bool> {
        self.follow_repo().exists(follower, followed).await
    }

    pub async fn followed_ids(&self, follower: UserId) -> Result<BTreeSet<UserId>> {
        self.follow_repo().followed_ids(follower).await
    }

    pub async fn follower_ids(&self, followed: UserId) -> Result<BTreeSet<UserId>> {
        self.follow_repo().follower_ids(followed).await
    }

    pub async fn count_followers(&self, followed: UserId) -> Result<u64> {
        self.follow_repo().count_followers(followed).await
    }

    pub async fn count_following(&self, follower: UserId) -> Result<u64> {
        self.follow_repo().count_following(follower).await
    }
}
