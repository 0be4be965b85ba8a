/// Subtask endpoints
///
/// Subtasks are addressed two ways: nested under their parent for listing
/// and creation, and by their own id for edits and deletion.
///
/// # Endpoints
///
/// - `GET    /api/tasks/:id/subtasks` - List (parent visible to caller)
/// - `POST   /api/tasks/:id/subtasks` - Create (parent owned by caller)
/// - `PUT    /api/subtasks/:id` - Partial update (parent owned by caller)
/// - `DELETE /api/subtasks/:id` - Delete (parent owned by caller)

use crate::{
    app::AppState,
    envelope::Envelope,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdeck_shared::{
    auth::{authorization, middleware::AuthContext},
    models::subtask::{Subtask, UpdateSubtask},
    models::task::Task,
};
use uuid::Uuid;
use validator::Validate;

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubtaskRequest {
    /// Subtask text
    #[validate(length(min = 1, max = 512, message = "Text must be 1-512 characters"))]
    pub text: String,
}

/// Partial update request; omitted fields stay unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSubtaskRequest {
    #[validate(length(min = 1, max = 512, message = "Text must be 1-512 characters"))]
    pub text: Option<String>,

    pub completed: Option<bool>,

    /// Explicit position update (subtasks have no bulk reorder)
    pub position: Option<i32>,
}

/// Fetches the parent task, requiring visibility (owner or assignee)
async fn visible_parent(state: &AppState, auth: &AuthContext, task_id: Uuid) -> ApiResult<Task> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if task.user_id != auth.user_id && task.assigned_to != Some(auth.user_id) {
        return Err(ApiError::Forbidden(
            "Not authorized to access this task".to_string(),
        ));
    }

    Ok(task)
}

/// Fetches the parent task, requiring ownership
async fn owned_parent(state: &AppState, auth: &AuthContext, task_id: Uuid) -> ApiResult<Task> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorization::require_owner(auth, task.user_id)?;

    Ok(task)
}

/// List a task's subtasks in display order
pub async fn list_subtasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Vec<Subtask>>>> {
    visible_parent(&state, &auth, task_id).await?;

    let subtasks = Subtask::list_by_task(&state.db, task_id).await?;

    Ok(Json(Envelope::new(subtasks)))
}

/// Create a subtask at the end of the parent's list
pub async fn create_subtask(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<CreateSubtaskRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Subtask>>)> {
    req.validate()?;

    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::validation("text", "Text must not be blank"));
    }

    owned_parent(&state, &auth, task_id).await?;

    let subtask = Subtask::create(&state.db, task_id, text).await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(subtask))))
}

/// Partial update of a subtask
pub async fn update_subtask(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSubtaskRequest>,
) -> ApiResult<Json<Envelope<Subtask>>> {
    req.validate()?;

    let text = req.text.map(|t| t.trim().to_string());
    if text.as_deref() == Some("") {
        return Err(ApiError::validation("text", "Text must not be blank"));
    }

    let update = UpdateSubtask {
        text,
        completed: req.completed,
        position: req.position,
    };

    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let subtask = Subtask::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subtask not found".to_string()))?;

    owned_parent(&state, &auth, subtask.task_id).await?;

    let subtask = Subtask::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subtask not found".to_string()))?;

    Ok(Json(Envelope::new(subtask)))
}

/// Delete a subtask
pub async fn delete_subtask(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<()>>> {
    let subtask = Subtask::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subtask not found".to_string()))?;

    owned_parent(&state, &auth, subtask.task_id).await?;

    Subtask::delete(&state.db, id).await?;

    Ok(Json(Envelope::new(())))
}
