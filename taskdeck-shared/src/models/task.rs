/// Task model and database operations
///
/// Tasks are the core entity: each belongs to exactly one owner and
/// carries an integer `position` that establishes the default display
/// order within that owner's list. A task may additionally be assigned to
/// another user, which grants visibility but no mutation rights.
///
/// # State machine
///
/// ```text
/// open ⇄ completed          (toggle is reversible)
/// open | completed → deleted (explicit delete or bulk clear-completed)
/// ```
///
/// # Ordering
///
/// Creation appends: the new task's position is max(position)+1 within
/// the owner's set. Deletion leaves gaps; listings tolerate them. A full
/// reorder (see `crate::ordering`) rewrites every position in one
/// transaction.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     text VARCHAR(512) NOT NULL,
///     description TEXT,
///     category VARCHAR(100),
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     remind BOOLEAN NOT NULL DEFAULT FALSE,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     position INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::query::TaskQuery;

/// Task priority level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Priority name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user (exclusive mutation and deletion rights)
    pub user_id: Uuid,

    /// Optional assignee (visibility only)
    pub assigned_to: Option<Uuid>,

    /// Short task text shown in the list
    pub text: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Optional free-form category label
    pub category: Option<String>,

    /// Priority level
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Whether the reminder scan should pick this task up
    pub remind: bool,

    /// Completion flag (the open ⇄ completed toggle)
    pub completed: bool,

    /// Ordering key within the owner's list
    pub position: i32,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task row joined with the assignee's username, as returned by listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskListing {
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
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskListing {
    /// Whether the task is overdue as of `today`
    ///
    /// A completed task is never overdue, whatever its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Owning user
    pub user_id: Uuid,

    /// Task text (required, non-empty)
    pub text: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional category
    pub category: Option<String>,

    /// Priority (defaults to medium)
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Whether reminders are requested
    pub remind: bool,
}

/// Input for a partial task update
///
/// Only non-None fields are written. `due_date` uses a nested Option so
/// callers can distinguish "leave unchanged" from "clear the date".
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub text: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub remind: Option<bool>,
    pub completed: Option<bool>,
}

impl UpdateTask {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.remind.is_none()
            && self.completed.is_none()
    }
}

/// Aggregate task counts for the analytics summary
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalyticsSummary {
    /// All tasks owned by the user
    pub total: i64,

    /// Tasks created since the start of the current week
    pub added_week: i64,

    /// Tasks completed since the start of the current week
    pub completed_week: i64,

    /// Tasks completed since midnight
    pub completed_today: i64,
}

impl Task {
    /// Creates a task at the end of the owner's list
    ///
    /// The position is assigned in the INSERT itself (max + 1 within the
    /// owner's set), so creation never renumbers existing rows.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, text, description, category, priority, due_date, remind, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM tasks WHERE user_id = $1))
            RETURNING id, user_id, assigned_to, text, description, category, priority,
                      due_date, remind, completed, position, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.text)
        .bind(data.description)
        .bind(data.category)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.remind)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, assigned_to, text, description, category, priority,
                   due_date, remind, completed, position, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID if it is visible to `user_id` (owner or assignee)
    pub async fn find_visible(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TaskListing>, sqlx::Error> {
        let task = sqlx::query_as::<_, TaskListing>(
            r#"
            SELECT t.id, t.user_id, t.assigned_to, au.username AS assigned_username,
                   t.text, t.description, t.category, t.priority, t.due_date,
                   t.remind, t.completed, t.position, t.created_at, t.updated_at
            FROM tasks t
            LEFT JOIN users au ON au.id = t.assigned_to
            WHERE t.id = $1 AND (t.user_id = $2 OR t.assigned_to = $2)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks visible to `user_id` under a query configuration
    ///
    /// Visible means owned by the user or assigned to them. The query's
    /// filter and search narrow the set, its sort orders the result;
    /// stored positions are never modified here.
    pub async fn list_visible(
        pool: &PgPool,
        user_id: Uuid,
        query: &TaskQuery,
    ) -> Result<Vec<TaskListing>, sqlx::Error> {
        let mut sql = String::from(
            "SELECT t.id, t.user_id, t.assigned_to, au.username AS assigned_username, \
             t.text, t.description, t.category, t.priority, t.due_date, \
             t.remind, t.completed, t.position, t.created_at, t.updated_at \
             FROM tasks t \
             LEFT JOIN users au ON au.id = t.assigned_to \
             WHERE (t.user_id = $1 OR t.assigned_to = $1)",
        );

        if let Some(clause) = query.filter.where_sql() {
            sql.push_str(" AND ");
            sql.push_str(clause);
        }

        let pattern = query.search_pattern();
        if pattern.is_some() {
            sql.push_str(" AND t.text ILIKE $2");
        }

        sql.push(' ');
        sql.push_str(query.sort.order_by_sql());

        let mut q = sqlx::query_as::<_, TaskListing>(&sql).bind(user_id);
        if let Some(pattern) = pattern {
            q = q.bind(pattern);
        }

        let tasks = q.fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Applies a partial update to a task owned by `owner_id`
    ///
    /// # Returns
    ///
    /// The updated task, or None when the task does not exist or is not
    /// owned by `owner_id` (the caller maps that to not-found vs
    /// forbidden).
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.text.is_some() {
            bind_count += 1;
            query.push_str(&format!(", text = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.remind.is_some() {
            bind_count += 1;
            query.push_str(&format!(", remind = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, assigned_to, text, description, category, priority, \
             due_date, remind, completed, position, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(owner_id);

        if let Some(text) = data.text {
            q = q.bind(text);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(remind) = data.remind {
            q = q.bind(remind);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task owned by `owner_id`
    ///
    /// Remaining positions are not renumbered; listings tolerate the gap.
    ///
    /// # Returns
    ///
    /// True if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bulk-removes all completed tasks owned by `owner_id`
    ///
    /// Idempotent: a second call deletes nothing and reports 0.
    ///
    /// # Returns
    ///
    /// The number of tasks deleted.
    pub async fn clear_completed(pool: &PgPool, owner_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = $1 AND completed = TRUE")
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Sets the assignee of a task
    ///
    /// Assignment grants the assignee visibility; ownership and deletion
    /// rights stay with the owner. The caller is responsible for the
    /// owner-or-admin check and the username lookup.
    pub async fn assign(
        pool: &PgPool,
        id: Uuid,
        assignee_id: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE tasks SET assigned_to = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(assignee_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregate counts for the owner's analytics summary
    ///
    /// Week boundaries follow Postgres `date_trunc('week', ...)` (Monday
    /// start); "today" is since midnight server time. Completion time is
    /// approximated by `updated_at`, which the open ⇄ completed toggle
    /// refreshes.
    pub async fn analytics_summary(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<AnalyticsSummary, sqlx::Error> {
        let summary = sqlx::query_as::<_, AnalyticsSummary>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE created_at >= date_trunc('week', NOW())) AS added_week,
                   COUNT(*) FILTER (WHERE completed AND updated_at >= date_trunc('week', NOW())) AS completed_week,
                   COUNT(*) FILTER (WHERE completed AND updated_at >= date_trunc('day', NOW())) AS completed_today
            FROM tasks
            WHERE user_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(completed: bool, due_date: Option<NaiveDate>) -> TaskListing {
        TaskListing {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            assigned_to: None,
            assigned_username: None,
            text: "test".to_string(),
            description: None,
            category: None,
            priority: TaskPriority::Medium,
            due_date,
            remind: false,
            completed,
            position: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_priority_as_str() {
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_overdue_requires_past_due_date() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();

        assert!(listing(false, Some(yesterday)).is_overdue(today));
        assert!(!listing(false, Some(today)).is_overdue(today));
        assert!(!listing(false, Some(tomorrow)).is_overdue(today));
        assert!(!listing(false, None).is_overdue(today));
    }

    #[test]
    fn test_completed_task_is_never_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();

        assert!(!listing(true, Some(yesterday)).is_overdue(today));
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());

        let update = UpdateTask {
            completed: Some(true),
            ..Default::default()
        };
        assert!(!update.is_empty());

        // Clearing the due date counts as a change
        let update = UpdateTask {
            due_date: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    // Database-backed operations are covered in tests/store_tests.rs
}
