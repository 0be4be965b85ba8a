/// Profile endpoints
///
/// # Endpoints
///
/// - `GET /api/profile` - Current user's profile
/// - `PUT /api/profile` - Edit display name and avatar

use crate::{
    app::AppState,
    envelope::Envelope,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::middleware::AuthContext,
    models::user::{UpdateUser, User, UserRole},
};
use uuid::Uuid;
use validator::Validate;

/// Profile as returned to clients (no password hash, no admin fields)
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            role: user.role,
        }
    }
}

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 255, message = "Display name must be at most 255 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,
}

/// Current user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Envelope<ProfileResponse>>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(Envelope::new(user.into())))
}

/// Edit display name and avatar
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Envelope<ProfileResponse>>> {
    req.validate()?;

    if req.display_name.is_none() && req.avatar_url.is_none() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let user = User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            display_name: req.display_name,
            avatar_url: req.avatar_url,
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(Envelope::new(user.into())))
}
