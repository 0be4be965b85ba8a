/// Reminder endpoints
///
/// # Endpoints
///
/// - `POST /api/reminders/send` - Run one due-reminder scan for the
///   caller and attempt delivery per task
///
/// Delivery is best-effort: per-task failures are logged and skipped, so
/// `sent` may be lower than `count`. There is no delivery ledger, so
/// calling this twice may notify twice.

use crate::{app::AppState, envelope::Envelope, error::ApiResult};
use axum::{extract::State, Extension, Json};
use serde::Serialize;
use taskdeck_shared::{auth::middleware::AuthContext, reminders};

/// Scan outcome
#[derive(Debug, Serialize)]
pub struct SendRemindersResponse {
    /// Notifications delivered
    pub sent: usize,

    /// Tasks found due soon
    pub count: usize,
}

/// Trigger a reminder scan for the authenticated owner
pub async fn send_reminders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Envelope<SendRemindersResponse>>> {
    let report =
        reminders::send_due_reminders(&state.db, state.notifier.as_ref(), auth.user_id).await?;

    Ok(Json(Envelope::new(SendRemindersResponse {
        sent: report.sent,
        count: report.scanned,
    })))
}
