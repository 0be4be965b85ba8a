/// Task endpoints
///
/// # Endpoints
///
/// - `GET    /api/tasks?filter=&sort=&q=` - Query-composed listing
/// - `POST   /api/tasks` - Create (appended to the end of the list)
/// - `GET    /api/tasks/:id` - Detail (owner or assignee)
/// - `PUT    /api/tasks/:id` - Partial update (owner only)
/// - `DELETE /api/tasks/:id` - Delete (owner only)
/// - `DELETE /api/tasks/completed` - Bulk clear completed, returns count
/// - `PUT    /api/tasks/reorder` - Full-list reorder (permutation contract)
/// - `PUT    /api/tasks/:id/assign` - Set assignee by username
///
/// Listing order is presentation only; the stored `position` changes only
/// through creation (append) and the reorder endpoint.

use crate::{
    app::AppState,
    envelope::Envelope,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use taskdeck_shared::{
    auth::{authorization, middleware::AuthContext},
    models::task::{CreateTask, Task, TaskListing, TaskPriority, UpdateTask},
    models::user::User,
    ordering,
    query::{TaskFilter, TaskQuery, TaskSort},
};
use uuid::Uuid;
use validator::Validate;

/// Query-string parameters for the task listing
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksParams {
    /// Sort mode: position (default), due, created
    pub sort: Option<String>,

    /// Free-text search over task text
    pub q: Option<String>,

    /// Completion filter: all (default), active, completed
    pub filter: Option<String>,
}

impl ListTasksParams {
    fn into_query(self) -> TaskQuery {
        TaskQuery {
            filter: TaskFilter::parse(self.filter.as_deref().unwrap_or_default()),
            sort: TaskSort::parse(self.sort.as_deref().unwrap_or_default()),
            search: self.q,
        }
    }
}

/// Task as returned to clients
///
/// Adds the presentation-only `overdue` flag to the stored fields.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub assigned_to: Option<Uuid>,
    pub assigned_username: Option<String>,
    pub text: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub remind: bool,
    pub completed: bool,
    pub overdue: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskListing> for TaskResponse {
    fn from(task: TaskListing) -> Self {
        let overdue = task.is_overdue(Utc::now().date_naive());
        Self {
            id: task.id,
            user_id: task.user_id,
            assigned_to: task.assigned_to,
            assigned_username: task.assigned_username,
            text: task.text,
            description: task.description,
            category: task.category,
            priority: task.priority,
            due_date: task.due_date,
            remind: task.remind,
            completed: task.completed,
            overdue,
            position: task.position,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        let overdue = !task.completed && task.due_date.is_some_and(|d| d < Utc::now().date_naive());
        Self {
            id: task.id,
            user_id: task.user_id,
            assigned_to: task.assigned_to,
            assigned_username: None,
            text: task.text,
            description: task.description,
            category: task.category,
            priority: task.priority,
            due_date: task.due_date,
            remind: task.remind,
            completed: task.completed,
            overdue,
            position: task.position,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task text
    #[validate(length(min = 1, max = 512, message = "Text must be 1-512 characters"))]
    pub text: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional category label
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    /// Priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// Optional due date (YYYY-MM-DD)
    pub due_date: Option<NaiveDate>,

    /// Whether the reminder scan should pick this task up
    #[serde(default)]
    pub remind: bool,
}

/// Deserializes a present-but-possibly-null field into `Some(None)` /
/// `Some(Some(v))`, leaving an absent field as `None` via serde's default
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Partial update request; omitted fields stay unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 512, message = "Text must be 1-512 characters"))]
    pub text: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    pub priority: Option<TaskPriority>,

    /// Explicit null clears the due date
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,

    pub remind: Option<bool>,

    pub completed: Option<bool>,
}

/// Reorder request: the complete new ordering of the owner's task ids
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<Uuid>,
}

/// Assignment request
#[derive(Debug, Deserialize, Validate)]
pub struct AssignRequest {
    /// Username of the new assignee
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
}

/// Assignment response
#[derive(Debug, Serialize)]
pub struct AssignResponse {
    pub task_id: Uuid,
    pub assigned_to: Uuid,
    pub assigned_username: String,
}

/// Bulk clear response
#[derive(Debug, Serialize)]
pub struct ClearCompletedResponse {
    /// Number of tasks deleted
    pub deleted: u64,
}

/// Fetches a task and requires the caller to own it
async fn owned_task(state: &AppState, auth: &AuthContext, id: Uuid) -> ApiResult<Task> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorization::require_owner(auth, task.user_id)?;

    Ok(task)
}

/// Ordered task listing under a `(filter, sort, search)` configuration
///
/// Unknown `filter`/`sort` values fall back to their defaults; an empty
/// result is a valid response.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<ListTasksParams>,
) -> ApiResult<Json<Envelope<Vec<TaskResponse>>>> {
    let query = params.into_query();

    let tasks = Task::list_visible(&state.db, auth.user_id, &query).await?;

    Ok(Json(Envelope::new(
        tasks.into_iter().map(TaskResponse::from).collect(),
    )))
}

/// Create a task at the end of the caller's list
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<TaskResponse>>)> {
    req.validate()?;

    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::validation("text", "Text must not be blank"));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: auth.user_id,
            text,
            description: req.description,
            category: req.category,
            priority: req.priority.unwrap_or_default(),
            due_date: req.due_date,
            remind: req.remind,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(task.into()))))
}

/// Task detail, visible to the owner and the assignee
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<TaskResponse>>> {
    let task = Task::find_visible(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(Envelope::new(task.into())))
}

/// Partial update of a task's mutable fields (owner only)
///
/// # Errors
///
/// - `400 Bad Request`: empty update
/// - `403 Forbidden`: caller is not the owner
/// - `404 Not Found`: unknown task id
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Envelope<TaskResponse>>> {
    req.validate()?;

    let text = req.text.map(|t| t.trim().to_string());
    if text.as_deref() == Some("") {
        return Err(ApiError::validation("text", "Text must not be blank"));
    }

    let update = UpdateTask {
        text,
        description: req.description,
        category: req.category,
        priority: req.priority,
        due_date: req.due_date,
        remind: req.remind,
        completed: req.completed,
    };

    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    owned_task(&state, &auth, id).await?;

    let task = Task::update(&state.db, id, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(Envelope::new(task.into())))
}

/// Delete a task (owner only)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<()>>> {
    owned_task(&state, &auth, id).await?;

    Task::delete(&state.db, id, auth.user_id).await?;

    Ok(Json(Envelope::new(())))
}

/// Bulk-remove the caller's completed tasks
///
/// Idempotent: a second call reports `deleted: 0` and changes nothing.
pub async fn clear_completed(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Envelope<ClearCompletedResponse>>> {
    let deleted = Task::clear_completed(&state.db, auth.user_id).await?;

    Ok(Json(Envelope::new(ClearCompletedResponse { deleted })))
}

/// Apply a full reorder of the caller's task list
///
/// The body must list every task the caller owns exactly once, in the
/// desired display order. Anything else is rejected without touching
/// stored positions: a duplicate, missing, or unknown id is a validation
/// failure (422); an id owned by another user is an authorization failure
/// (403).
pub async fn reorder_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ReorderRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    ordering::reorder_tasks(&state.db, auth.user_id, &req.order).await?;

    Ok(Json(Envelope::new(())))
}

/// Set a task's assignee by username (owner or admin)
///
/// Assignment grants the assignee visibility only; ownership and deletion
/// rights stay with the owner.
///
/// # Errors
///
/// - `403 Forbidden`: caller is neither the owner nor an admin
/// - `404 Not Found`: unknown task id or unknown username; the assignee
///   is left unchanged
pub async fn assign_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<Json<Envelope<AssignResponse>>> {
    req.validate()?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorization::require_owner_or_admin(&auth, task.user_id)?;

    let assignee = User::find_by_username(&state.db, req.username.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No user named '{}'", req.username.trim())))?;

    Task::assign(&state.db, id, Some(assignee.id)).await?;

    Ok(Json(Envelope::new(AssignResponse {
        task_id: id,
        assigned_to: assignee.id,
        assigned_username: assignee.username,
    })))
}
