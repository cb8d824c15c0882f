//! User endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::progress;
use crate::AppState;

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> Result<Json<UserListResponse>> {
    let users = state.db.get_all_users().await?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/users/:id
pub async fn get(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>> {
    let user = state.db.get_user(user_id).await?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<DeletedResponse>> {
    let deleted = state.db.delete_user(user_id).await?;
    tracing::info!(user_id, "Deleted user");
    Ok(Json(DeletedResponse { deleted }))
}

/// GET /api/users/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<UserProfileResponse>> {
    let user = state.db.get_user(auth.user_id).await?;
    let lessons_stats = progress::user_lessons_stats(state.db.as_ref(), user.id).await?;

    Ok(Json(UserProfileResponse {
        id: user.id,
        username: user.username,
        created_at: user.created_at,
        lessons_stats,
    }))
}
