use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, CreatePostRequest};
use crate::models::Post;

/// `POST /api/posts`
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<ApiResponse<Post>>, ApiError> {
    let post = state
        .user_service()
        .publish_post(current.id(), &payload.body)
        .await?;
    Ok(Json(ApiResponse::success(post)))
}
