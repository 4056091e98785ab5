//! Telework session repository implementation.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use telehub_core::error::{AppError, ErrorKind};
use telehub_core::result::AppResult;
use telehub_core::types::pagination::{PageRequest, PageResponse};
use telehub_entity::session::activity::SessionActivity;
use telehub_entity::session::{SessionStatus, TeleworkSession};

/// Repository for telework session persistence and time accounting.
#[derive(Debug, Clone)]
pub struct TeleworkSessionRepository {
    pool: PgPool,
}

impl TeleworkSessionRepository {
    /// Create a new telework session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TeleworkSession>> {
        sqlx::query_as::<_, TeleworkSession>("SELECT * FROM telework_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Find the open session for a user on a given work date.
    pub async fn find_open(
        &self,
        user_id: Uuid,
        work_date: NaiveDate,
    ) -> AppResult<Option<TeleworkSession>> {
        sqlx::query_as::<_, TeleworkSession>(
            "SELECT * FROM telework_sessions \
             WHERE user_id = $1 AND work_date = $2 AND check_out IS NULL",
        )
        .bind(user_id)
        .bind(work_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find open session", e)
        })
    }

    /// Open a new session for a user.
    ///
    /// The partial unique index on (user_id, work_date) for open rows turns a
    /// double check-in into a conflict instead of a second session.
    pub async fn check_in(
        &self,
        user_id: Uuid,
        work_date: NaiveDate,
        at: DateTime<Utc>,
        activity: &SessionActivity,
    ) -> AppResult<TeleworkSession> {
        let initial = serde_json::to_value(std::slice::from_ref(activity))?;

        sqlx::query_as::<_, TeleworkSession>(
            "INSERT INTO telework_sessions (user_id, work_date, check_in, status, last_heartbeat_at, activities) \
             VALUES ($1, $2, $3, 'connected', $3, $4) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(work_date)
        .bind(at)
        .bind(&initial)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("telework_sessions_open_per_day") =>
            {
                AppError::conflict("An open telework session already exists for this day".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to check in", e),
        })
    }

    /// Apply a heartbeat to an open session.
    ///
    /// Adds the reported delta to the accumulated active time, optionally
    /// moves the session to a new status, and advances the heartbeat clock.
    pub async fn apply_heartbeat(
        &self,
        session_id: Uuid,
        delta_seconds: i64,
        status: Option<SessionStatus>,
        at: DateTime<Utc>,
    ) -> AppResult<TeleworkSession> {
        let updated = sqlx::query_as::<_, TeleworkSession>(
            "UPDATE telework_sessions \
             SET active_seconds = active_seconds + $2, \
                 status = COALESCE($3, status), \
                 last_heartbeat_at = $4, \
                 updated_at = NOW() \
             WHERE id = $1 AND check_out IS NULL \
             RETURNING *",
        )
        .bind(session_id)
        .bind(delta_seconds)
        .bind(status)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to apply heartbeat", e)
        })?;

        match updated {
            Some(session) => Ok(session),
            None => Err(self.closed_or_missing(session_id).await),
        }
    }

    /// Append an activity entry to an open session's activity log.
    pub async fn append_activity(
        &self,
        session_id: Uuid,
        activity: &SessionActivity,
    ) -> AppResult<TeleworkSession> {
        let entry = serde_json::to_value(activity)?;

        let updated = sqlx::query_as::<_, TeleworkSession>(
            "UPDATE telework_sessions \
             SET activities = activities || $2::jsonb, updated_at = NOW() \
             WHERE id = $1 AND check_out IS NULL \
             RETURNING *",
        )
        .bind(session_id)
        .bind(&entry)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append activity", e)
        })?;

        match updated {
            Some(session) => Ok(session),
            None => Err(self.closed_or_missing(session_id).await),
        }
    }

    /// Close an open session.
    pub async fn check_out(
        &self,
        session_id: Uuid,
        at: DateTime<Utc>,
        forced: bool,
        activity: &SessionActivity,
    ) -> AppResult<TeleworkSession> {
        let entry = serde_json::to_value(activity)?;

        let updated = sqlx::query_as::<_, TeleworkSession>(
            "UPDATE telework_sessions \
             SET check_out = $2, \
                 status = 'offline', \
                 forced_checkout = $3, \
                 activities = activities || $4::jsonb, \
                 updated_at = NOW() \
             WHERE id = $1 AND check_out IS NULL \
             RETURNING *",
        )
        .bind(session_id)
        .bind(at)
        .bind(forced)
        .bind(&entry)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check out", e))?;

        match updated {
            Some(session) => Ok(session),
            None => Err(self.closed_or_missing(session_id).await),
        }
    }

    /// List a user's sessions within a date range, newest first.
    pub async fn history(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TeleworkSession>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM telework_sessions \
             WHERE user_id = $1 AND work_date BETWEEN $2 AND $3",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count session history", e)
        })?;

        let sessions = sqlx::query_as::<_, TeleworkSession>(
            "SELECT * FROM telework_sessions \
             WHERE user_id = $1 AND work_date BETWEEN $2 AND $3 \
             ORDER BY work_date DESC, check_in DESC LIMIT $4 OFFSET $5",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list session history", e)
        })?;

        Ok(PageResponse::new(
            sessions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all open sessions with pagination (admin view).
    pub async fn find_all_open(
        &self,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TeleworkSession>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM telework_sessions WHERE check_out IS NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count open sessions", e)
        })?;

        let sessions = sqlx::query_as::<_, TeleworkSession>(
            "SELECT * FROM telework_sessions WHERE check_out IS NULL \
             ORDER BY check_in DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list open sessions", e)
        })?;

        Ok(PageResponse::new(
            sessions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Find open sessions whose heartbeat clock has fallen behind the cutoff.
    ///
    /// Sessions that never reported a heartbeat fall back to their check-in
    /// time, so a client that died right after checking in still goes stale.
    pub async fn find_stale(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<TeleworkSession>> {
        sqlx::query_as::<_, TeleworkSession>(
            "SELECT * FROM telework_sessions \
             WHERE check_out IS NULL AND status != 'offline' \
             AND COALESCE(last_heartbeat_at, check_in) < $1",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find stale sessions", e)
        })
    }

    /// Mark an open session as offline without closing it.
    pub async fn mark_offline(&self, session_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE telework_sessions SET status = 'offline', updated_at = NOW() \
             WHERE id = $1 AND check_out IS NULL",
        )
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark session offline", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Find sessions still open from work dates before the given date.
    pub async fn find_open_before(&self, date: NaiveDate) -> AppResult<Vec<TeleworkSession>> {
        sqlx::query_as::<_, TeleworkSession>(
            "SELECT * FROM telework_sessions WHERE check_out IS NULL AND work_date < $1",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find overdue sessions", e)
        })
    }

    /// Find closed sessions for a given work date (for attendance rollup).
    pub async fn find_closed_on(&self, date: NaiveDate) -> AppResult<Vec<TeleworkSession>> {
        sqlx::query_as::<_, TeleworkSession>(
            "SELECT * FROM telework_sessions WHERE work_date = $1 AND check_out IS NOT NULL",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find closed sessions", e)
        })
    }

    /// Count open sessions system-wide.
    pub async fn count_open(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM telework_sessions WHERE check_out IS NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count open sessions", e)
        })?;
        Ok(count as u64)
    }

    /// Count open sessions grouped by status.
    pub async fn count_open_by_status(&self) -> AppResult<Vec<(SessionStatus, i64)>> {
        sqlx::query_as::<_, (SessionStatus, i64)>(
            "SELECT status, COUNT(*) FROM telework_sessions \
             WHERE check_out IS NULL GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count sessions by status", e)
        })
    }

    /// Sum active seconds per work date for a user within a date range.
    pub async fn daily_totals(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<(NaiveDate, i64)>> {
        sqlx::query_as::<_, (NaiveDate, i64)>(
            "SELECT work_date, SUM(active_seconds)::BIGINT FROM telework_sessions \
             WHERE user_id = $1 AND work_date BETWEEN $2 AND $3 \
             GROUP BY work_date ORDER BY work_date ASC",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sum daily totals", e)
        })
    }

    /// Resolve why an open-session update matched no rows.
    async fn closed_or_missing(&self, session_id: Uuid) -> AppError {
        match self.find_by_id(session_id).await {
            Ok(Some(_)) => {
                AppError::conflict(format!("Session {session_id} is already checked out"))
            }
            Ok(None) => AppError::not_found(format!("Session {session_id} not found")),
            Err(e) => e,
        }
    }
}
