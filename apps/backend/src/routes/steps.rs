//! Step endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::progress;
use crate::AppState;

/// GET /api/steps/:id
pub async fn get(State(state): State<AppState>, Path(step_id): Path<i64>) -> Result<Json<DbStep>> {
    let step = state.db.get_one::<DbStep>(step_id).await?;
    Ok(Json(step))
}

/// PUT /api/steps/:id
pub async fn update(
    State(state): State<AppState>,
    Path(step_id): Path<i64>,
    Json(payload): Json<UpdateStepRequest>,
) -> Result<Json<DbStep>> {
    let step = state.db.update_one::<DbStep>(step_id, &payload).await?;
    Ok(Json(step))
}

/// DELETE /api/steps/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(step_id): Path<i64>,
) -> Result<Json<DeletedResponse>> {
    let deleted = state.db.delete_one::<DbStep>(step_id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// POST /api/steps/:id/texts
pub async fn add_text(
    State(state): State<AppState>,
    Path(step_id): Path<i64>,
    Json(payload): Json<CreateTextRequest>,
) -> Result<Json<DbStepText>> {
    state.db.get_one::<DbStep>(step_id).await?;

    let new_text = NewStepText {
        lesson_step_id: step_id,
        name: payload.name,
        text: payload.text,
    };
    let text = state.db.add_one::<DbStepText>(&new_text).await?;
    Ok(Json(text))
}

/// POST /api/steps/:id/result
pub async fn set_result(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(step_id): Path<i64>,
    Json(payload): Json<StepResultUpdate>,
) -> Result<Json<StepResultResponse>> {
    let id = progress::set_step_result(state.db.as_ref(), auth.user_id, step_id, &payload).await?;
    Ok(Json(StepResultResponse { id }))
}
