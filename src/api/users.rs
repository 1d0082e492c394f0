//! Profile endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, ProfileDto, UpdateProfileRequest, UserDto};
use crate::services::UserError;

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(name) => Self::user_not_found(&name),
            UserError::Validation(msg) => Self::validation(msg),
            UserError::Conflict(msg) => Self::Conflict(msg),
            UserError::Database(msg) => Self::DatabaseError(msg),
            UserError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/users/{username}`
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let profile = state
        .user_service()
        .profile(current.id(), &username)
        .await?;
    Ok(Json(ApiResponse::success(ProfileDto::new(
        profile,
        current.id(),
    ))))
}

/// `GET /api/users/{username}/followers`
pub async fn list_followers(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.user_service().list_followers(&username).await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::public).collect(),
    )))
}

/// `GET /api/users/{username}/following`
pub async fn list_following(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.user_service().list_following(&username).await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::public).collect(),
    )))
}

/// `PUT /api/users/me`
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .user_service()
        .update_profile(current.id(), &payload.username, &payload.about_me)
        .await?;
    Ok(Json(ApiResponse::success(UserDto::private(user))))
}
