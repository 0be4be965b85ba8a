/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new account (role: customer)
/// - `POST /api/auth/login` - Login with username or email, get tokens
/// - `POST /api/auth/refresh` - Refresh the access token
/// - `POST /api/auth/logout` - Stateless logout acknowledgement
/// - `GET  /api/auth/me` - Current session identity
/// - `PUT  /api/auth/password` - Change the password

use crate::{
    app::AppState,
    envelope::Envelope,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, UpdateUser, User, UserRole},
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,

    /// Optional email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Password
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email address
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token pair issued at registration and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// User ID
    pub user_id: Uuid,

    /// Login name
    pub username: String,

    /// Account role
    pub role: UserRole,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Current session identity
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// User ID
    pub id: Uuid,

    /// Login name
    pub username: String,

    /// Account role
    pub role: UserRole,
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password, verified before the change
    pub current: String,

    /// New password
    pub new: String,
}

fn issue_tokens(user: &User, secret: &str) -> ApiResult<(String, String)> {
    let access_claims = jwt::Claims::new(user.id, &user.username, user.role, jwt::TokenType::Access);
    let refresh_claims =
        jwt::Claims::new(user.id, &user.username, user.role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, secret)?;
    let refresh_token = jwt::create_token(&refresh_claims, secret)?;

    Ok((access_token, refresh_token))
}

/// Register a new user
///
/// New accounts get the `customer` role; an admin can promote them later.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed (username length,
///   email format, password policy)
/// - `409 Conflict`: username or email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<SessionResponse>>)> {
    req.validate()?;

    password::validate_password_strength(&req.password)
        .map_err(|message| ApiError::validation("password", message))?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            role: UserRole::Customer,
        },
    )
    .await?;

    let (access_token, refresh_token) = issue_tokens(&user, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(SessionResponse {
            user_id: user.id,
            username: user.username,
            role: user.role,
            access_token,
            refresh_token,
        })),
    ))
}

/// Login with username or email
///
/// # Errors
///
/// - `401 Unauthorized`: unknown identifier or wrong password
/// - `403 Forbidden`: account is blocked
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Envelope<SessionResponse>>> {
    req.validate()?;

    let user = User::find_by_identifier(&state.db, req.username.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    if user.blocked {
        return Err(ApiError::Forbidden("Account is blocked".to_string()));
    }

    User::update_last_login(&state.db, user.id).await?;

    let (access_token, refresh_token) = issue_tokens(&user, state.jwt_secret())?;

    Ok(Json(Envelope::new(SessionResponse {
        user_id: user.id,
        username: user.username,
        role: user.role,
        access_token,
        refresh_token,
    })))
}

/// Exchange a refresh token for a new access token
///
/// # Errors
///
/// - `401 Unauthorized`: invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<Envelope<RefreshResponse>>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(Envelope::new(RefreshResponse { access_token })))
}

/// Logout acknowledgement
///
/// Tokens are stateless, so there is nothing to revoke server-side; the
/// client discards its tokens. The endpoint exists so the UI has a single
/// logout call.
pub async fn logout(Extension(_auth): Extension<AuthContext>) -> ApiResult<Json<Envelope<()>>> {
    Ok(Json(Envelope::new(())))
}

/// Current session identity
pub async fn me(Extension(auth): Extension<AuthContext>) -> ApiResult<Json<Envelope<MeResponse>>> {
    Ok(Json(Envelope::new(MeResponse {
        id: auth.user_id,
        username: auth.username,
        role: auth.role,
    })))
}

/// Change the current user's password
///
/// # Errors
///
/// - `400 Bad Request`: current password is wrong
/// - `422 Unprocessable Entity`: new password fails the policy
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<Envelope<()>>> {
    password::validate_password_strength(&req.new)
        .map_err(|message| ApiError::validation("new", message))?;

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = password::verify_password(&req.current, &user.password_hash)?;
    if !valid {
        return Err(ApiError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.new)?;

    User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            password_hash: Some(password_hash),
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(Envelope::new(())))
}
