use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::entities::users;

/// User record returned from the store (without the password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub about_me: Option<String>,
    pub last_seen: Option<String>,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::new(model.id),
            username: model.username,
            email: model.email,
            about_me: model.about_me,
            last_seen: model.last_seen,
            created_at: model.created_at,
        }
    }
}
