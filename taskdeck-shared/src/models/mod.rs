/// Database models for TaskDeck
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts, roles, and admin management
/// - `task`: Tasks with ordered positions, assignment, and analytics
/// - `subtask`: Checklist items nested under a task
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{CreateUser, User, UserRole};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "ada".to_string(),
///         email: Some("ada@example.com".to_string()),
///         password_hash: "$argon2id$...".to_string(),
///         role: UserRole::Customer,
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod subtask;
pub mod task;
pub mod user;
