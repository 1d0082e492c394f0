pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod feed_service;
pub mod feed_service_impl;
pub use feed_service::{FeedError, FeedService};
pub use feed_service_impl::SeaOrmFeedService;

pub mod follow_service;
pub mod follow_service_impl;
pub use follow_service::{FollowCounts, FollowError, FollowGraph};
pub use follow_service_impl::SeaOrmFollowGraph;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{Profile, UserError, UserService};
pub use user_service_impl::SeaOrmUserService;

pub mod mailer;
pub use mailer::{Email, LogMailer, Mailer};

pub mod validation;
