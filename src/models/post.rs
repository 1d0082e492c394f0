use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::entities::{posts, users};

/// Maximum post length in characters.
pub const MAX_POST_LENGTH: usize = 140;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub body: String,
    pub timestamp: String,
    pub author_id: UserId,
}

impl From<posts::Model> for Post {
    fn from(model: posts::Model) -> Self {
        Self {
            id: model.id,
            body: model.body,
            timestamp: model.timestamp,
            author_id: UserId::new(model.user_id),
        }
    }
}

/// A post joined with its author's username, as shown in feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: i32,
    pub body: String,
    pub timestamp: String,
    pub author_id: UserId,
    pub author: String,
}

impl PostView {
    pub(crate) fn from_models(post: posts::Model, author: Option<users::Model>) -> Self {
        Self {
            id: post.id,
            body: post.body,
            timestamp: post.timestamp,
            author_id: UserId::new(post.user_id),
            author: author.map(|u| u.username).unwrap_or_default(),
        }
    }
}
