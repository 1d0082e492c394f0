use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, FollowDto};
use crate::services::FollowError;

impl From<FollowError> for ApiError {
    fn from(err: FollowError) -> Self {
        match err {
            FollowError::NotFound(msg) => Self::NotFound(format!("User {msg} not found")),
            FollowError::SelfFollow => Self::validation("You cannot follow yourself"),
            FollowError::Database(msg) => Self::DatabaseError(msg),
            FollowError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `POST /api/users/{username}/follow`
pub async fn follow(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<FollowDto>>, ApiError> {
    let target = state.user_service().get_by_username(&username).await?;
    let changed = state.follow_graph().follow(current.id(), target.id).await?;

    Ok(Json(ApiResponse::success(FollowDto {
        username: target.username,
        following: true,
        changed,
    })))
}

/// `POST /api/users/{username}/unfollow`
pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<FollowDto>>, ApiError> {
    let target = state.user_service().get_by_username(&username).await?;
    let changed = state
        .follow_graph()
        .unfollow(current.id(), target.id)
        .await
        .map_err(|err| match err {
            FollowError::SelfFollow => ApiError::validation("You cannot unfollow yourself"),
            other => ApiError::from(other),
        })?;

    Ok(Json(ApiResponse::success(FollowDto {
        username: target.username,
        following: false,
        changed,
    })))
}
