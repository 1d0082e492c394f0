//! Feed endpoints: the signed-in user's timeline, the global explore feed,
//! and a single author's posts.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::PageQuery;
use super::{ApiError, ApiResponse, AppState};
use crate::domain::Page;
use crate::models::PostView;
use crate::services::FeedError;

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::InvalidArgument(msg) => Self::validation(msg),
            FeedError::UserNotFound(msg) => Self::NotFound(format!("User {msg} not found")),
            FeedError::Database(msg) => Self::DatabaseError(msg),
            FeedError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/timeline`
///
/// Posts by the current user and everyone they follow, newest first.
pub async fn timeline(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<PostView>>>, ApiError> {
    let (page, per_page) = query.resolve(&state.config().feed)?;
    let feed = state
        .feed_service()
        .timeline(current.id(), page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(feed)))
}

/// `GET /api/explore`
pub async fn explore(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<PostView>>>, ApiError> {
    let (page, per_page) = query.resolve(&state.config().feed)?;
    let feed = state.feed_service().explore(page, per_page).await?;
    Ok(Json(ApiResponse::success(feed)))
}

/// `GET /api/users/{username}/posts`
pub async fn user_posts(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<PostView>>>, ApiError> {
    let (page, per_page) = query.resolve(&state.config().feed)?;
    let author = state.user_service().get_by_username(&username).await?;
    let feed = state
        .feed_service()
        .user_posts(author.id, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(feed)))
}
