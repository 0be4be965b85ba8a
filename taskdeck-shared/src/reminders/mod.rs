/// Due-task reminders
///
/// On invocation the reminder trigger scans one owner's tasks for entries
/// that asked for a reminder, are not completed, and fall due soon (today
/// or tomorrow), then attempts one notification per task through a
/// [`Notifier`]. Delivery is best-effort: a failure for one task is logged
/// and the scan moves on. There is no delivery ledger, so repeated
/// invocations may re-notify — exactly-once delivery is an accepted
/// non-goal.
///
/// The scan is triggered by client activity (`POST /api/reminders/send`);
/// there is no background scheduler.
///
/// # Notifiers
///
/// - [`smtp::SmtpNotifier`]: production delivery via lettre
/// - [`mock::MemoryNotifier`]: in-memory recording for tests and demos

pub mod mock;
pub mod smtp;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::user::User;

/// Error type for notification delivery
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Recipient or sender address could not be parsed
    #[error("Invalid address: {0}")]
    Address(String),

    /// The message could not be built
    #[error("Failed to build message: {0}")]
    Message(String),

    /// The transport refused or failed to deliver
    #[error("Delivery failed: {0}")]
    Transport(String),
}

/// A delivery channel for reminders
///
/// Implementations must be safe to call concurrently; one failed delivery
/// must not poison the channel for subsequent calls.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempts to deliver a single notification
    async fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// A task picked up by the due scan
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DueTask {
    /// Task ID
    pub id: Uuid,

    /// Task text, quoted in the notification
    pub text: String,

    /// Due date (always present for scanned tasks)
    pub due_date: NaiveDate,
}

/// Outcome of one reminder scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderReport {
    /// Tasks the scan found due soon
    pub scanned: usize,

    /// Notifications actually delivered
    pub sent: usize,
}

/// Fetches the owner's tasks that are due soon and want a reminder
///
/// "Soon" means a due date between today and tomorrow inclusive, per the
/// server's date. Completed tasks and tasks without a due date are never
/// picked up.
pub async fn scan_due_tasks(pool: &PgPool, owner_id: Uuid) -> Result<Vec<DueTask>, sqlx::Error> {
    let tasks = sqlx::query_as::<_, DueTask>(
        r#"
        SELECT id, text, due_date
        FROM tasks
        WHERE user_id = $1
          AND remind = TRUE
          AND completed = FALSE
          AND due_date IS NOT NULL
          AND due_date BETWEEN CURRENT_DATE AND CURRENT_DATE + 1
        ORDER BY due_date ASC, position ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Runs one reminder scan for an owner and attempts delivery per task
///
/// Each due task produces one notification to the owner's email address.
/// Per-task delivery failures are logged and skipped — this is the only
/// place errors are deliberately swallowed. An owner without an email
/// address gets a scan result but no deliveries.
///
/// # Errors
///
/// Returns an error only if the scan itself fails; delivery failures are
/// reflected in `sent < scanned`.
pub async fn send_due_reminders(
    pool: &PgPool,
    notifier: &dyn Notifier,
    owner_id: Uuid,
) -> Result<ReminderReport, sqlx::Error> {
    let due = scan_due_tasks(pool, owner_id).await?;

    let mut report = ReminderReport {
        scanned: due.len(),
        sent: 0,
    };

    if due.is_empty() {
        return Ok(report);
    }

    let email = User::find_by_id(pool, owner_id).await?.and_then(|u| u.email);

    let Some(email) = email else {
        debug!(owner = %owner_id, due = report.scanned, "Owner has no email address, skipping reminder delivery");
        return Ok(report);
    };

    for task in &due {
        let body = format!("Reminder: '{}' is due {}", task.text, task.due_date);

        match notifier.notify(&email, "Task Reminder", &body).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                warn!(task = %task.id, error = %e, "Reminder delivery failed, continuing");
            }
        }
    }

    debug!(owner = %owner_id, scanned = report.scanned, sent = report.sent, "Reminder scan complete");
    Ok(report)
}
