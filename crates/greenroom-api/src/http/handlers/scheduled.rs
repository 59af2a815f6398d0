//! Scheduler-invoked endpoints.

use axum::extract::State;
use chrono::{Days, Utc};
use serde::Serialize;
use tracing::info;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NotificationReport {
    pub date: String,
    pub groups_notified: usize,
    pub pushes_sent: usize,
    pub groups_failed: usize,
}

/// POST /scheduled/daily_notification
///
/// Runs the day-before reminder fan-out for tomorrow's practices. The
/// external scheduler fires this once a day; re-fires are safe because
/// already notified groups have no unflagged practices left.
pub async fn daily_notification(
    State(state): State<AppState>,
) -> Result<ApiResponse<NotificationReport>, AppError> {
    let target = Utc::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::Internal("date overflow".to_string()))?;

    let report = state.notifier.run(target).await?;
    info!(
        date = %target,
        groups = report.groups_notified,
        pushes = report.pushes_sent,
        failed = report.groups_failed,
        "daily notification run finished"
    );

    Ok(ApiResponse::ok(NotificationReport {
        date: target.to_string(),
        groups_notified: report.groups_notified,
        pushes_sent: report.pushes_sent,
        groups_failed: report.groups_failed,
    }))
}
