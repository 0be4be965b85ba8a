/// Subtask model and database operations
///
/// Subtasks are checklist items nested under a task. They follow the same
/// create/toggle/delete contract as tasks, scoped by the parent task id:
/// creation appends by position, listings order by (position, created_at),
/// and there is no bulk reorder — only per-item position updates.
///
/// Access control happens at the parent: callers verify the parent task's
/// visibility (read) or ownership (write) before touching subtasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Subtask row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subtask {
    /// Unique subtask ID
    pub id: Uuid,

    /// Parent task
    pub task_id: Uuid,

    /// Subtask text
    pub text: String,

    /// Completion flag
    pub completed: bool,

    /// Ordering key within the parent task
    pub position: i32,

    /// When the subtask was created
    pub created_at: DateTime<Utc>,

    /// When the subtask was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for a partial subtask update
#[derive(Debug, Clone, Default)]
pub struct UpdateSubtask {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub position: Option<i32>,
}

impl UpdateSubtask {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none() && self.position.is_none()
    }
}

impl Subtask {
    /// Creates a subtask at the end of the parent's list
    pub async fn create(pool: &PgPool, task_id: Uuid, text: String) -> Result<Self, sqlx::Error> {
        let subtask = sqlx::query_as::<_, Subtask>(
            r#"
            INSERT INTO subtasks (task_id, text, position)
            VALUES ($1, $2,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM subtasks WHERE task_id = $1))
            RETURNING id, task_id, text, completed, position, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(text)
        .fetch_one(pool)
        .await?;

        Ok(subtask)
    }

    /// Finds a subtask by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let subtask = sqlx::query_as::<_, Subtask>(
            r#"
            SELECT id, task_id, text, completed, position, created_at, updated_at
            FROM subtasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(subtask)
    }

    /// Lists a task's subtasks in display order
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let subtasks = sqlx::query_as::<_, Subtask>(
            r#"
            SELECT id, task_id, text, completed, position, created_at, updated_at
            FROM subtasks
            WHERE task_id = $1
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(subtasks)
    }

    /// Applies a partial update
    ///
    /// # Returns
    ///
    /// The updated subtask, or None if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateSubtask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE subtasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.text.is_some() {
            bind_count += 1;
            query.push_str(&format!(", text = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed = ${}", bind_count));
        }
        if data.position.is_some() {
            bind_count += 1;
            query.push_str(&format!(", position = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, task_id, text, completed, position, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Subtask>(&query).bind(id);

        if let Some(text) = data.text {
            q = q.bind(text);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }
        if let Some(position) = data.position {
            q = q.bind(position);
        }

        let subtask = q.fetch_optional(pool).await?;

        Ok(subtask)
    }

    /// Deletes a subtask
    ///
    /// # Returns
    ///
    /// True if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_subtask_is_empty() {
        assert!(UpdateSubtask::default().is_empty());

        let update = UpdateSubtask {
            completed: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    // Database-backed operations are covered in tests/store_tests.rs
}
