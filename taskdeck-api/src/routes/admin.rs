/// Admin console endpoints
///
/// Role-gated by the admin middleware layer in `crate::app`; handlers can
/// assume the caller is an admin.
///
/// # Endpoints
///
/// - `GET /api/admin/users?q=&role=` - List/filter user accounts
/// - `PUT /api/admin/users/:id` - Edit account fields, role, blocked flag

use crate::{
    app::AppState,
    envelope::Envelope,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdeck_shared::models::user::{UpdateUser, User, UserRole};
use uuid::Uuid;
use validator::Validate;

/// Query-string parameters for the user listing
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersParams {
    /// Substring match over username or email
    pub q: Option<String>,

    /// Restrict to one role; unknown values are ignored
    pub role: Option<String>,
}

/// User account as shown in the admin console
#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for AdminUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            role: user.role,
            blocked: user.blocked,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Admin account update request
#[derive(Debug, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(length(max = 255, message = "Display name must be at most 255 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Role name; must be one of customer, user, admin
    pub role: Option<String>,

    pub blocked: Option<bool>,
}

/// List user accounts, optionally filtered by search text and role
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> ApiResult<Json<Envelope<Vec<AdminUserResponse>>>> {
    let role = params.role.as_deref().and_then(UserRole::parse);

    let users = User::search(&state.db, params.q.as_deref(), role).await?;

    Ok(Json(Envelope::new(
        users.into_iter().map(AdminUserResponse::from).collect(),
    )))
}

/// Edit a user account
///
/// # Errors
///
/// - `422 Unprocessable Entity`: unknown role name or malformed fields
/// - `404 Not Found`: unknown user id
/// - `409 Conflict`: email already taken
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AdminUpdateUserRequest>,
) -> ApiResult<Json<Envelope<AdminUserResponse>>> {
    req.validate()?;

    let role = match req.role.as_deref() {
        Some(name) => Some(
            UserRole::parse(name)
                .ok_or_else(|| ApiError::validation("role", format!("Unknown role '{}'", name)))?,
        ),
        None => None,
    };

    let update = UpdateUser {
        email: req.email,
        display_name: req.display_name,
        avatar_url: req.avatar_url,
        role,
        blocked: req.blocked,
        ..Default::default()
    };

    if update.email.is_none()
        && update.display_name.is_none()
        && update.avatar_url.is_none()
        && update.role.is_none()
        && update.blocked.is_none()
    {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let user = User::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(Envelope::new(user.into())))
}
