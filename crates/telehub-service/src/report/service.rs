//! Dashboard and per-user reporting.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use telehub_auth::guards;
use telehub_core::error::AppError;
use telehub_database::repositories::attendance::AttendanceRepository;
use telehub_database::repositories::task::TaskRepository;
use telehub_database::repositories::telework_session::TeleworkSessionRepository;
use telehub_database::repositories::user::UserRepository;
use telehub_entity::user::UserStatus;

use crate::context::RequestContext;

/// Generates dashboard and per-user reports.
#[derive(Debug, Clone)]
pub struct ReportService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Telework session repository.
    session_repo: Arc<TeleworkSessionRepository>,
    /// Task repository.
    task_repo: Arc<TaskRepository>,
    /// Attendance repository.
    attendance_repo: Arc<AttendanceRepository>,
}

/// A labelled count in a status breakdown.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StatusCount {
    /// Status label.
    pub status: String,
    /// Number of rows with this status.
    pub count: i64,
}

/// A labelled count in an attendance kind breakdown.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct KindCount {
    /// Attendance kind label.
    pub kind: String,
    /// Number of records with this kind.
    pub count: i64,
}

/// System-wide overview for the admin dashboard.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OverviewReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Total registered users.
    pub total_users: i64,
    /// Users with active status.
    pub active_users: i64,
    /// Currently open telework sessions.
    pub open_sessions: i64,
    /// Open sessions grouped by presence status.
    pub sessions_by_status: Vec<StatusCount>,
    /// Today's attendance records grouped by kind.
    pub attendance_today: Vec<KindCount>,
    /// Tasks grouped by workflow status.
    pub tasks_by_status: Vec<StatusCount>,
}

/// Active seconds accumulated on one work date.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DailyTotal {
    /// The work date.
    pub date: NaiveDate,
    /// Active seconds accumulated on the date.
    pub active_seconds: i64,
}

/// One user's telework time over a trailing week.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WeeklyReport {
    /// The user the report covers.
    pub user_id: Uuid,
    /// First day of the period.
    pub from: NaiveDate,
    /// Last day of the period.
    pub to: NaiveDate,
    /// Per-day totals; days without sessions appear with zero seconds.
    pub days: Vec<DailyTotal>,
    /// Sum over the period.
    pub total_seconds: i64,
}

impl ReportService {
    /// Creates a new report service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        session_repo: Arc<TeleworkSessionRepository>,
        task_repo: Arc<TaskRepository>,
        attendance_repo: Arc<AttendanceRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            task_repo,
            attendance_repo,
        }
    }

    /// Generates the system overview (manager view).
    pub async fn overview(&self, ctx: &RequestContext) -> Result<OverviewReport, AppError> {
        guards::require_manager(ctx.role)?;

        let today = Utc::now().date_naive();

        let total_users = self.user_repo.count().await? as i64;
        let active_users = self.user_repo.count_by_status(UserStatus::Active).await? as i64;
        let open_sessions = self.session_repo.count_open().await? as i64;

        let sessions_by_status = self
            .session_repo
            .count_open_by_status()
            .await?
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count,
            })
            .collect();

        let attendance_today = self
            .attendance_repo
            .count_by_kind_on(today)
            .await?
            .into_iter()
            .map(|(kind, count)| KindCount {
                kind: kind.to_string(),
                count,
            })
            .collect();

        let tasks_by_status = self
            .task_repo
            .count_by_status()
            .await?
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count,
            })
            .collect();

        Ok(OverviewReport {
            generated_at: Utc::now(),
            total_users,
            active_users,
            open_sessions,
            sessions_by_status,
            attendance_today,
            tasks_by_status,
        })
    }

    /// Generates a user's telework totals for the trailing week.
    pub async fn weekly(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
    ) -> Result<WeeklyReport, AppError> {
        guards::require_self_or_manager(ctx.user_id, ctx.role, user_id)?;

        let to = Utc::now().date_naive();
        let from = to - Duration::days(6);

        let totals: HashMap<NaiveDate, i64> = self
            .session_repo
            .daily_totals(user_id, from, to)
            .await?
            .into_iter()
            .collect();

        let mut days = Vec::with_capacity(7);
        let mut total_seconds = 0i64;
        let mut date = from;
        while date <= to {
            let active_seconds = totals.get(&date).copied().unwrap_or(0);
            total_seconds += active_seconds;
            days.push(DailyTotal {
                date,
                active_seconds,
            });
            date += Duration::days(1);
        }

        Ok(WeeklyReport {
            user_id,
            from,
            to,
            days,
            total_seconds,
        })
    }
}
