use axum::{
    Extension, Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::{Expiry, Session};

use super::{ApiError, ApiResponse, AppState, MessageResponse, UserDto};
use crate::domain::{TokenError, UserId};
use crate::models::User;
use crate::services::AuthError;

const SESSION_USER_KEY: &str = "user_id";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub password2: String,
}

/// The signed-in user, inserted by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.0.id
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::unauthorized("Invalid username or password"),
            AuthError::Unauthorized => Self::unauthorized("Not authenticated"),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Conflict(msg) => Self::Conflict(msg),
            AuthError::InvalidToken(TokenError::Expired) => {
                Self::validation("The password reset link has expired")
            }
            AuthError::InvalidToken(_) => Self::validation("The password reset link is invalid"),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the session cookie to a user, stamps `last_seen`, and makes the
/// user available to handlers as `Extension<CurrentUser>`.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = session
        .get::<i32>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let user = match state.auth_service().current_user(UserId::new(user_id)).await {
        Ok(user) => user,
        Err(AuthError::Unauthorized) => {
            // The account behind this session is gone.
            let _ = session.flush().await;
            return Err(ApiError::unauthorized("Not authenticated"));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::Span::current().record("user_id", user.id.value());

    if let Err(e) = state.auth_service().touch_last_seen(user.id).await {
        tracing::warn!("Failed to update last_seen for user {}: {}", user.id, e);
    }

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .auth_service()
        .register(
            &payload.username,
            &payload.email,
            &payload.password,
            &payload.password2,
        )
        .await?;

    Ok(Json(ApiResponse::success(UserDto::private(user))))
}

/// POST /auth/login
/// Starts a session. With `remember_me` the session survives for
/// `server.remember_me_days`; otherwise it ends after inactivity.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    if payload.remember_me {
        let days = state.config().server.remember_me_days;
        session.set_expiry(Some(Expiry::OnInactivity(time::Duration::days(days))));
    }

    session
        .insert(SESSION_USER_KEY, user.id.value())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(ApiResponse::success(UserDto::private(user))))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    Json(ApiResponse::success(MessageResponse::new("Logged out")))
}

/// GET /auth/me
pub async fn get_current_user(
    Extension(current): Extension<CurrentUser>,
) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::success(UserDto::private(current.0)))
}

/// POST /auth/reset-password/request
/// Always answers with the same message, whether or not the address is known.
pub async fn request_password_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service()
        .request_password_reset(&payload.email)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Check your email for the instructions to reset your password",
    ))))
}

/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service()
        .reset_password(&payload.token, &payload.password, &payload.password2)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Your password has been reset",
    ))))
}
