use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::models::User;
use crate::services::Profile;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Public view of a user. The email address is only shown to its owner.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub about_me: Option<String>,
    pub last_seen: Option<String>,
    pub created_at: String,
}

impl UserDto {
    #[must_use]
    pub fn public(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: None,
            about_me: user.about_me,
            last_seen: user.last_seen,
            created_at: user.created_at,
        }
    }

    #[must_use]
    pub fn private(user: User) -> Self {
        let email = Some(user.email.clone());
        Self {
            email,
            ..Self::public(user)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub user: UserDto,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    pub is_following: bool,
    pub is_me: bool,
}

impl ProfileDto {
    #[must_use]
    pub fn new(profile: Profile, viewer: UserId) -> Self {
        let is_me = profile.user.id == viewer;
        let user = if is_me {
            UserDto::private(profile.user)
        } else {
            UserDto::public(profile.user)
        };

        Self {
            user,
            followers: profile.followers,
            following: profile.following,
            posts: profile.posts,
            is_following: profile.is_following,
            is_me,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FollowDto {
    pub username: String,
    pub following: bool,
    /// False when the request left the graph unchanged.
    pub changed: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    #[serde(default)]
    pub about_me: String,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: u64,
}
