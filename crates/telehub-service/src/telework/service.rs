//! Telework session lifecycle — check-in, heartbeats, check-out.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use telehub_auth::guards;
use telehub_core::config::TeleworkConfig;
use telehub_core::error::AppError;
use telehub_core::events::{ChangeEvent, ChangePayload, ChangePublisher, SessionChanged};
use telehub_core::types::pagination::{PageRequest, PageResponse};
use telehub_database::repositories::attendance::AttendanceRepository;
use telehub_database::repositories::telework_session::TeleworkSessionRepository;
use telehub_entity::attendance::AttendanceKind;
use telehub_entity::session::activity::{ActivityKind, SessionActivity};
use telehub_entity::session::{SessionStatus, TeleworkSession};

use crate::context::RequestContext;

/// Handles the telework session lifecycle.
#[derive(Clone)]
pub struct TeleworkService {
    /// Telework session repository.
    session_repo: Arc<TeleworkSessionRepository>,
    /// Attendance repository.
    attendance_repo: Arc<AttendanceRepository>,
    /// Telework configuration.
    config: TeleworkConfig,
    /// Change event sink.
    publisher: Arc<dyn ChangePublisher>,
}

impl std::fmt::Debug for TeleworkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeleworkService")
            .field("config", &self.config)
            .finish()
    }
}

/// A heartbeat reported by a client for its open session.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HeartbeatRequest {
    /// The session the heartbeat belongs to.
    pub session_id: Uuid,
    /// Active seconds elapsed since the previous report.
    pub delta_seconds: i64,
    /// New presence status, if the user changed it.
    pub status: Option<SessionStatus>,
    /// Free-form activity note, if the user wrote one.
    pub activity_note: Option<String>,
}

impl TeleworkService {
    /// Creates a new telework service.
    pub fn new(
        session_repo: Arc<TeleworkSessionRepository>,
        attendance_repo: Arc<AttendanceRepository>,
        config: TeleworkConfig,
        publisher: Arc<dyn ChangePublisher>,
    ) -> Self {
        Self {
            session_repo,
            attendance_repo,
            config,
            publisher,
        }
    }

    /// Opens a telework session for today.
    ///
    /// At most one open session per user per day; a second check-in
    /// surfaces as a conflict.
    pub async fn check_in(
        &self,
        ctx: &RequestContext,
        note: Option<String>,
    ) -> Result<TeleworkSession, AppError> {
        let now = Utc::now();
        let today = now.date_naive();

        self.check_note_length(note.as_deref())?;
        let activity = SessionActivity::now(ActivityKind::CheckIn, note);
        let session = self
            .session_repo
            .check_in(ctx.user_id, today, now, &activity)
            .await?;

        self.attendance_repo
            .upsert(
                ctx.user_id,
                today,
                AttendanceKind::Telework,
                session.active_seconds,
                Some(session.id),
                None,
            )
            .await?;

        info!(user_id = %ctx.user_id, session_id = %session.id, "Telework check-in");

        self.publish(
            Some(ctx.user_id),
            SessionChanged::CheckedIn {
                session: session.summary(),
            },
        );

        Ok(session)
    }

    /// Closes one of the caller's open sessions.
    pub async fn check_out(
        &self,
        ctx: &RequestContext,
        session_id: Uuid,
        note: Option<String>,
    ) -> Result<TeleworkSession, AppError> {
        self.check_note_length(note.as_deref())?;

        let existing = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;
        if existing.user_id != ctx.user_id {
            return Err(AppError::authorization(
                "Cannot check out another user's session",
            ));
        }

        let activity = SessionActivity::now(ActivityKind::CheckOut, note);
        let session = self
            .session_repo
            .check_out(session_id, Utc::now(), false, &activity)
            .await?;

        self.record_attendance(&session).await?;

        info!(
            user_id = %ctx.user_id,
            session_id = %session.id,
            active_seconds = session.active_seconds,
            "Telework check-out"
        );

        self.publish(
            Some(ctx.user_id),
            SessionChanged::CheckedOut {
                session: session.summary(),
                forced: false,
                checked_out_by: None,
            },
        );

        Ok(session)
    }

    /// Applies a heartbeat to the caller's open session.
    ///
    /// The delta is added to accumulated active time as reported; the
    /// server never recomputes it from wall-clock differences.
    pub async fn heartbeat(
        &self,
        ctx: &RequestContext,
        req: HeartbeatRequest,
    ) -> Result<TeleworkSession, AppError> {
        if req.delta_seconds < 0 {
            return Err(AppError::validation("Heartbeat delta must be non-negative"));
        }
        if req.status == Some(SessionStatus::Offline) {
            return Err(AppError::validation(
                "Offline status is set by the server, not by heartbeats",
            ));
        }
        self.check_note_length(req.activity_note.as_deref())?;

        let existing = self
            .session_repo
            .find_by_id(req.session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {} not found", req.session_id)))?;

        if existing.user_id != ctx.user_id {
            return Err(AppError::authorization(
                "Cannot report a heartbeat for another user's session",
            ));
        }

        let mut session = self
            .session_repo
            .apply_heartbeat(req.session_id, req.delta_seconds, req.status, Utc::now())
            .await?;

        if let Some(status) = req.status {
            if status != existing.status {
                let entry =
                    SessionActivity::now(ActivityKind::StatusChange, Some(status.to_string()));
                session = self.session_repo.append_activity(req.session_id, &entry).await?;
            }
        }

        if let Some(note) = req.activity_note {
            let trimmed = note.trim();
            if !trimmed.is_empty() {
                let entry =
                    SessionActivity::now(ActivityKind::Note, Some(trimmed.to_string()));
                session = self.session_repo.append_activity(req.session_id, &entry).await?;
            }
        }

        self.publish(
            Some(ctx.user_id),
            SessionChanged::Updated {
                session: session.summary(),
            },
        );

        Ok(session)
    }

    /// Returns the caller's open session for today, if any.
    pub async fn today(&self, ctx: &RequestContext) -> Result<Option<TeleworkSession>, AppError> {
        self.session_repo
            .find_open(ctx.user_id, Utc::now().date_naive())
            .await
    }

    /// Lists a user's session history within a date range.
    ///
    /// Defaults to the configured trailing window when no range is given.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        page: &PageRequest,
    ) -> Result<PageResponse<TeleworkSession>, AppError> {
        guards::require_self_or_manager(ctx.user_id, ctx.role, user_id)?;

        let to = to.unwrap_or_else(|| Utc::now().date_naive());
        let from =
            from.unwrap_or_else(|| to - Duration::days(self.config.history_default_days as i64));

        if from > to {
            return Err(AppError::validation("Range start must not be after its end"));
        }

        self.session_repo.history(user_id, from, to, page).await
    }

    /// Lists all open sessions (manager view).
    pub async fn list_open(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<TeleworkSession>, AppError> {
        guards::require_manager(ctx.role)?;
        self.session_repo.find_all_open(page).await
    }

    /// Forcibly closes any open session (manager action).
    pub async fn force_check_out(
        &self,
        ctx: &RequestContext,
        session_id: Uuid,
        reason: Option<String>,
    ) -> Result<TeleworkSession, AppError> {
        guards::require_manager(ctx.role)?;

        let description = match reason {
            Some(reason) if !reason.trim().is_empty() => {
                format!("Checked out by {}: {}", ctx.username, reason.trim())
            }
            _ => format!("Checked out by {}", ctx.username),
        };
        let activity = SessionActivity::now(ActivityKind::System, Some(description));
        let session = self
            .session_repo
            .check_out(session_id, Utc::now(), true, &activity)
            .await?;

        self.record_attendance(&session).await?;

        warn!(
            admin_id = %ctx.user_id,
            session_id = %session.id,
            user_id = %session.user_id,
            "Forced telework check-out"
        );

        self.publish(
            Some(ctx.user_id),
            SessionChanged::CheckedOut {
                session: session.summary(),
                forced: true,
                checked_out_by: Some(ctx.user_id),
            },
        );

        Ok(session)
    }

    /// Marks open sessions whose heartbeat clock has gone quiet as offline.
    ///
    /// Sessions stay open; accumulated time is preserved and the owner can
    /// resume by sending a heartbeat. Returns the number of sessions marked.
    pub async fn sweep_stale(&self) -> Result<u64, AppError> {
        let cutoff = Utc::now() - Duration::seconds(self.config.stale_after_seconds as i64);
        let stale = self.session_repo.find_stale(cutoff).await?;

        let mut marked = 0u64;
        for session in stale {
            if !self.session_repo.mark_offline(session.id).await? {
                continue;
            }
            marked += 1;

            info!(
                session_id = %session.id,
                user_id = %session.user_id,
                "Marked stale session offline"
            );

            let mut summary = session.summary();
            summary.status = SessionStatus::Offline.to_string();
            self.publish(None, SessionChanged::Updated { session: summary });
        }

        Ok(marked)
    }

    /// Force-closes sessions still open from work dates before `today`.
    ///
    /// Returns the number of sessions closed.
    pub async fn close_overdue(&self, today: NaiveDate) -> Result<u64, AppError> {
        let overdue = self.session_repo.find_open_before(today).await?;

        let mut closed = 0u64;
        for session in overdue {
            let activity = SessionActivity::now(
                ActivityKind::System,
                Some("Automatic checkout at end of day".to_string()),
            );
            let session = match self
                .session_repo
                .check_out(session.id, Utc::now(), true, &activity)
                .await
            {
                Ok(session) => session,
                // A concurrent manual checkout is fine; skip it.
                Err(e) if e.is_conflict() => continue,
                Err(e) => return Err(e),
            };

            self.record_attendance(&session).await?;
            closed += 1;

            info!(
                session_id = %session.id,
                user_id = %session.user_id,
                work_date = %session.work_date,
                "Automatic checkout of overdue session"
            );

            self.publish(
                None,
                SessionChanged::CheckedOut {
                    session: session.summary(),
                    forced: true,
                    checked_out_by: None,
                },
            );
        }

        Ok(closed)
    }

    fn check_note_length(&self, note: Option<&str>) -> Result<(), AppError> {
        if let Some(note) = note {
            if note.len() > self.config.max_activity_note_length {
                return Err(AppError::validation(format!(
                    "Activity note exceeds {} characters",
                    self.config.max_activity_note_length
                )));
            }
        }
        Ok(())
    }

    /// Writes the attendance record reflecting a closed session.
    async fn record_attendance(&self, session: &TeleworkSession) -> Result<(), AppError> {
        self.attendance_repo
            .upsert(
                session.user_id,
                session.work_date,
                AttendanceKind::Telework,
                session.active_seconds,
                Some(session.id),
                None,
            )
            .await?;
        Ok(())
    }

    fn publish(&self, actor_id: Option<Uuid>, change: SessionChanged) {
        self.publisher
            .publish(ChangeEvent::new(actor_id, ChangePayload::Session(change)));
    }
}
