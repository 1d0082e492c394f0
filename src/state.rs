use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, FeedService, FollowGraph, LogMailer, Mailer, SeaOrmAuthService,
    SeaOrmFeedService, SeaOrmFollowGraph, SeaOrmUserService, UserService,
};

/// Everything the HTTP handlers and CLI commands share. Built once at start-up.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub follow_graph: Arc<dyn FollowGraph>,

    pub feed_service: Arc<dyn FeedService>,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_mailer(config, Arc::new(LogMailer)).await
    }

    /// Like [`SharedState::new`] but with a caller-supplied mail transport.
    pub async fn with_mailer(config: Config, mailer: Arc<dyn Mailer>) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::from_store(config, store, mailer))
    }

    #[must_use]
    pub fn from_store(config: Config, store: Store, mailer: Arc<dyn Mailer>) -> Self {
        let follow_graph =
            Arc::new(SeaOrmFollowGraph::new(store.clone())) as Arc<dyn FollowGraph>;
        let feed_service = Arc::new(SeaOrmFeedService::new(store.clone())) as Arc<dyn FeedService>;
        let user_service = Arc::new(SeaOrmUserService::new(store.clone())) as Arc<dyn UserService>;
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
            config.mail.clone(),
            mailer,
        )) as Arc<dyn AuthService>;

        Self {
            config: Arc::new(config),
            store,
            follow_graph,
            feed_service,
            auth_service,
            user_service,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
