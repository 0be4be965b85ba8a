/// Analytics endpoints
///
/// # Endpoints
///
/// - `GET /api/analytics/summary` - Aggregate counts for the caller's
///   tasks: total, added this week, completed this week, completed today

use crate::{app::AppState, envelope::Envelope, error::ApiResult};
use axum::{extract::State, Extension, Json};
use taskdeck_shared::{auth::middleware::AuthContext, models::task::{AnalyticsSummary, Task}};

/// Aggregate task counts for the authenticated owner
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Envelope<AnalyticsSummary>>> {
    let summary = Task::analytics_summary(&state.db, auth.user_id).await?;

    Ok(Json(Envelope::new(summary)))
}
