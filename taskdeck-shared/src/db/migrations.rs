/// Database migration runner and first-run seeding
///
/// Migrations live in the `migrations/` directory at the workspace root,
/// one `{timestamp}_{name}.sql` file per change, applied by sqlx's
/// embedded migrator.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::db::migrations::run_migrations;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

use crate::auth::password::hash_password;
use crate::models::user::{CreateUser, User, UserRole};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed or fails to execute.
/// Failed migrations are rolled back where Postgres allows it.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Ensures an `admin` account exists
///
/// Called at startup when `ADMIN_PASSWORD` is configured. Does nothing if
/// a user named `admin` is already present, so rotating the variable does
/// not overwrite a live account.
///
/// # Returns
///
/// True if the admin user was created, false if it already existed.
pub async fn ensure_admin_user(pool: &PgPool, password: &str) -> anyhow::Result<bool> {
    if User::find_by_username(pool, "admin").await?.is_some() {
        return Ok(false);
    }

    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("failed to hash admin password: {e}"))?;

    User::create(
        pool,
        CreateUser {
            username: "admin".to_string(),
            email: Some("admin@example.com".to_string()),
            password_hash,
            role: UserRole::Admin,
        },
    )
    .await?;

    info!("Seeded initial admin user");
    Ok(true)
}
