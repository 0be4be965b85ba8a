/// Bearer-token authentication for Axum handlers
///
/// The API server wraps [`authenticate`] in a middleware layer that runs
/// before every protected route: it pulls the bearer token out of the
/// `Authorization` header, validates it, and stores an [`AuthContext`] in
/// the request extensions for handlers to extract.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use taskdeck_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.username)
/// }
/// ```

use axum::http::{header, HeaderMap};

use super::jwt::{validate_access_token, Claims, JwtError};
use crate::models::user::UserRole;
use uuid::Uuid;

/// Authentication context stored in request extensions
///
/// Everything a handler needs to enforce ownership and role checks
/// without re-reading the token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Login name
    pub username: String,

    /// Account role
    pub role: UserRole,
}

impl AuthContext {
    /// Builds a context from validated access-token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
            role: claims.role,
        }
    }
}

/// Error type for authentication failures
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not a bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

/// Authenticates a request from its headers
///
/// Extracts the `Authorization: Bearer <token>` header, validates the
/// access token, and returns the resulting [`AuthContext`].
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] — no Authorization header
/// - [`AuthError::InvalidFormat`] — header is not a bearer token
/// - [`AuthError::InvalidToken`] — signature, expiry, or type check failed
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    Ok(AuthContext::from_claims(&claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, TokenType};
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_authenticate_valid_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "ada", UserRole::User, TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();

        let auth = authenticate(&bearer_headers(&token), SECRET).unwrap();
        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.username, "ada");
        assert_eq!(auth.role, UserRole::User);
    }

    #[test]
    fn test_authenticate_missing_header() {
        let result = authenticate(&HeaderMap::new(), SECRET);
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_authenticate_non_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        let result = authenticate(&headers, SECRET);
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_authenticate_rejects_refresh_token() {
        let claims = Claims::new(Uuid::new_v4(), "ada", UserRole::User, TokenType::Refresh);
        let token = create_token(&claims, SECRET).unwrap();

        let result = authenticate(&bearer_headers(&token), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_authenticate_rejects_garbage_token() {
        let result = authenticate(&bearer_headers("not.a.jwt"), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
