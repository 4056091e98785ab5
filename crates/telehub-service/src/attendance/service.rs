//! Attendance records — per-day kind tracking and the nightly rollup.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::info;
use uuid::Uuid;

use telehub_auth::guards;
use telehub_core::error::AppError;
use telehub_database::repositories::attendance::AttendanceRepository;
use telehub_database::repositories::telework_session::TeleworkSessionRepository;
use telehub_database::repositories::user::UserRepository;
use telehub_entity::attendance::{AttendanceKind, AttendanceRecord};
use telehub_entity::user::User;

use crate::context::RequestContext;

/// Handles attendance record operations.
#[derive(Debug, Clone)]
pub struct AttendanceService {
    /// Attendance repository.
    attendance_repo: Arc<AttendanceRepository>,
    /// Telework session repository.
    session_repo: Arc<TeleworkSessionRepository>,
    /// User repository.
    user_repo: Arc<UserRepository>,
}

/// Request to set a user's attendance kind for a work date.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SetAttendanceRequest {
    /// The work date the record covers.
    pub work_date: NaiveDate,
    /// Attendance kind for the day.
    pub kind: AttendanceKind,
    /// Free-form note (optional).
    pub note: Option<String>,
}

/// One row of the team attendance view.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TeamAttendanceEntry {
    /// The user the row describes.
    pub user: User,
    /// The user's record for the day, if one exists.
    pub record: Option<AttendanceRecord>,
}

impl AttendanceService {
    /// Creates a new attendance service.
    pub fn new(
        attendance_repo: Arc<AttendanceRepository>,
        session_repo: Arc<TeleworkSessionRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            attendance_repo,
            session_repo,
            user_repo,
        }
    }

    /// Sets a user's attendance kind for a work date.
    ///
    /// Active seconds accumulated by telework sessions are preserved; this
    /// only reclassifies the day (office, leave, sick and so on).
    pub async fn set_record(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        req: SetAttendanceRequest,
    ) -> Result<AttendanceRecord, AppError> {
        guards::require_self_or_manager(ctx.user_id, ctx.role, user_id)?;

        let existing = self
            .attendance_repo
            .find_by_user_date(user_id, req.work_date)
            .await?;

        let (active_seconds, session_id) = existing
            .map(|r| (r.active_seconds, r.session_id))
            .unwrap_or((0, None));

        let record = self
            .attendance_repo
            .upsert(
                user_id,
                req.work_date,
                req.kind,
                active_seconds,
                session_id,
                req.note.as_deref(),
            )
            .await?;

        info!(
            actor_id = %ctx.user_id,
            user_id = %user_id,
            work_date = %req.work_date,
            kind = %record.kind,
            "Attendance record set"
        );

        Ok(record)
    }

    /// Returns a user's attendance record for a single work date.
    pub async fn day(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        guards::require_self_or_manager(ctx.user_id, ctx.role, user_id)?;
        self.attendance_repo.find_by_user_date(user_id, work_date).await
    }

    /// Lists a user's attendance records for a calendar month.
    pub async fn month(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        guards::require_self_or_manager(ctx.user_id, ctx.role, user_id)?;

        let from = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::validation("Invalid year or month"))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let to = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .ok_or_else(|| AppError::validation("Invalid year or month"))?
            - Duration::days(1);

        self.attendance_repo
            .find_by_user_range(user_id, from, to)
            .await
    }

    /// Returns today's attendance for every active user (manager view).
    ///
    /// Users without a record yet appear with `record: None`.
    pub async fn team_today(
        &self,
        ctx: &RequestContext,
        today: NaiveDate,
    ) -> Result<Vec<TeamAttendanceEntry>, AppError> {
        guards::require_manager(ctx.role)?;

        let users = self.user_repo.find_active().await?;
        let records = self.attendance_repo.find_by_date(today).await?;

        let mut by_user: HashMap<Uuid, AttendanceRecord> =
            records.into_iter().map(|r| (r.user_id, r)).collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let record = by_user.remove(&user.id);
                TeamAttendanceEntry { user, record }
            })
            .collect())
    }

    /// Reconciles attendance against closed sessions for a work date.
    ///
    /// Sums active time from every session closed on the date and upserts a
    /// telework record per user. Run nightly after the overdue checkout pass
    /// so manual corrections made during the day are folded in. Returns the
    /// number of users whose records were written.
    pub async fn rollup_for(&self, work_date: NaiveDate) -> Result<u64, AppError> {
        let sessions = self.session_repo.find_closed_on(work_date).await?;

        let mut totals: HashMap<Uuid, (i64, Option<Uuid>)> = HashMap::new();
        for session in sessions {
            let entry = totals.entry(session.user_id).or_insert((0, None));
            entry.0 += session.active_seconds;
            entry.1 = Some(session.id);
        }

        let mut written = 0u64;
        for (user_id, (active_seconds, session_id)) in totals {
            self.attendance_repo
                .upsert(
                    user_id,
                    work_date,
                    AttendanceKind::Telework,
                    active_seconds,
                    session_id,
                    None,
                )
                .await?;
            written += 1;
        }

        info!(work_date = %work_date, users = written, "Attendance rollup complete");

        Ok(written)
    }

    /// Sums a user's active seconds over a date range.
    pub async fn total_seconds(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, AppError> {
        guards::require_self_or_manager(ctx.user_id, ctx.role, user_id)?;

        if from > to {
            return Err(AppError::validation("Range start must not be after its end"));
        }

        self.attendance_repo
            .total_seconds_in_range(user_id, from, to)
            .await
    }
}
