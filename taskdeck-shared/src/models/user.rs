/// User model and database operations
///
/// Users own tasks and authenticate with a username (or email) plus
/// password. Roles gate the admin console; a blocked account can no longer
/// log in but its data is kept. Users are never hard-deleted by the
/// application.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username CITEXT NOT NULL UNIQUE,
///     email CITEXT UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     display_name VARCHAR(255),
///     avatar_url VARCHAR(512),
///     role user_role NOT NULL DEFAULT 'customer',
///     blocked BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Account role
///
/// `Customer` is the self-registration default. `User` is a full member
/// (granted by an admin). `Admin` can manage other accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    User,
    Admin,
}

impl UserRole {
    /// Role name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    /// Whether this role can access the admin console
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Parses a role name, rejecting unknown values
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(UserRole::Customer),
            "user" => Some(UserRole::User),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// User account row
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login name (case-insensitive via CITEXT, unique)
    pub username: String,

    /// Optional email address (unique when present)
    pub email: Option<String>,

    /// Argon2id password hash
    pub password_hash: String,

    /// Optional display name shown in the UI
    pub display_name: Option<String>,

    /// Optional avatar/profile picture URL
    pub avatar_url: Option<String>,

    /// Account role
    pub role: UserRole,

    /// Blocked accounts cannot log in
    pub blocked: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Login name
    pub username: String,

    /// Optional email address
    pub email: Option<String>,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Initial role (Customer for self-registration)
    pub role: UserRole,
}

/// Input for updating an existing user
///
/// Only non-None fields are written. Used by both profile edits (name and
/// avatar) and the admin console (all fields).
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New email address
    pub email: Option<String>,

    /// New password hash
    pub password_hash: Option<String>,

    /// New display name
    pub display_name: Option<String>,

    /// New avatar URL
    pub avatar_url: Option<String>,

    /// New role (admin console only)
    pub role: Option<UserRole>,

    /// Block or unblock the account (admin console only)
    pub blocked: Option<bool>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email already exists (unique
    /// constraint violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, display_name, avatar_url,
                      role, blocked, created_at, updated_at, last_login_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, display_name, avatar_url,
                   role, blocked, created_at, updated_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (case-insensitive)
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, display_name, avatar_url,
                   role, blocked, created_at, updated_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by login identifier: username or email
    ///
    /// The login form accepts either; both columns are CITEXT so the
    /// lookup is case-insensitive.
    pub async fn find_by_identifier(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, display_name, avatar_url,
                   role, blocked, created_at, updated_at, last_login_at
            FROM users
            WHERE username = $1 OR email = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` are written; `updated_at` is bumped.
    ///
    /// # Returns
    ///
    /// The updated user, or None if the user does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the UPDATE dynamically from the fields that are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if data.display_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", display_name = ${}", bind_count));
        }
        if data.avatar_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", avatar_url = ${}", bind_count));
        }
        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${}", bind_count));
        }
        if data.blocked.is_some() {
            bind_count += 1;
            query.push_str(&format!(", blocked = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, username, email, password_hash, display_name, \
             avatar_url, role, blocked, created_at, updated_at, last_login_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(display_name) = data.display_name {
            q = q.bind(display_name);
        }
        if let Some(avatar_url) = data.avatar_url {
            q = q.bind(avatar_url);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }
        if let Some(blocked) = data.blocked {
            q = q.bind(blocked);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Stamps the last-login timestamp after successful authentication
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists users for the admin console
    ///
    /// `search` matches username or email as a case-insensitive substring;
    /// `role` restricts to a single role. Newest accounts first.
    pub async fn search(
        pool: &PgPool,
        search: Option<&str>,
        role: Option<UserRole>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT id, username, email, password_hash, display_name, avatar_url, \
             role, blocked, created_at, updated_at, last_login_at FROM users WHERE TRUE",
        );
        let mut bind_count = 0;

        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", crate::query::escape_like(s)));

        if pattern.is_some() {
            bind_count += 1;
            query.push_str(&format!(
                " AND (username LIKE ${n} OR email LIKE ${n})",
                n = bind_count
            ));
        }
        if role.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND role = ${}", bind_count));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, User>(&query);
        if let Some(pattern) = pattern {
            q = q.bind(pattern);
        }
        if let Some(role) = role {
            q = q.bind(role);
        }

        let users = q.fetch_all(pool).await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_round_trip() {
        for role in [UserRole::Customer, UserRole::User, UserRole::Admin] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("superuser"), None);
        assert_eq!(UserRole::parse(""), None);
    }

    #[test]
    fn test_only_admin_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
        assert!(!UserRole::Customer.is_admin());
    }

    #[test]
    fn test_update_user_default_is_empty() {
        let update = UpdateUser::default();
        assert!(update.email.is_none());
        assert!(update.password_hash.is_none());
        assert!(update.display_name.is_none());
        assert!(update.avatar_url.is_none());
        assert!(update.role.is_none());
        assert!(update.blocked.is_none());
    }

    // Database-backed operations are covered in tests/store_tests.rs
}
