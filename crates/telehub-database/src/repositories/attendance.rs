//! Attendance record repository implementation.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use telehub_core::error::{AppError, ErrorKind};
use telehub_core::result::AppResult;
use telehub_entity::attendance::{AttendanceKind, AttendanceRecord};

/// Repository for attendance record persistence.
///
/// Attendance is keyed by (user, work date), so writes go through an
/// upsert rather than separate create and update paths.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    /// Create a new attendance repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or replace the attendance record for a user on a work date.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        work_date: NaiveDate,
        kind: AttendanceKind,
        active_seconds: i64,
        session_id: Option<Uuid>,
        note: Option<&str>,
    ) -> AppResult<AttendanceRecord> {
        sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance_records (user_id, work_date, kind, active_seconds, session_id, note) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, work_date) DO UPDATE \
             SET kind = EXCLUDED.kind, \
                 active_seconds = EXCLUDED.active_seconds, \
                 session_id = COALESCE(EXCLUDED.session_id, attendance_records.session_id), \
                 note = COALESCE(EXCLUDED.note, attendance_records.note), \
                 updated_at = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(work_date)
        .bind(&kind)
        .bind(active_seconds)
        .bind(session_id)
        .bind(note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert attendance record", e)
        })
    }

    /// Find the attendance record for a user on a work date.
    pub async fn find_by_user_date(
        &self,
        user_id: Uuid,
        work_date: NaiveDate,
    ) -> AppResult<Option<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE user_id = $1 AND work_date = $2",
        )
        .bind(user_id)
        .bind(work_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find attendance record", e)
        })
    }

    /// List a user's attendance records within a date range, oldest first.
    pub async fn find_by_user_range(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records \
             WHERE user_id = $1 AND work_date BETWEEN $2 AND $3 \
             ORDER BY work_date ASC",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list attendance records", e)
        })
    }

    /// List every user's attendance record for a work date.
    pub async fn find_by_date(&self, work_date: NaiveDate) -> AppResult<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE work_date = $1 ORDER BY user_id",
        )
        .bind(work_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to list attendance records by date",
                e,
            )
        })
    }

    /// Count attendance records for a work date grouped by kind.
    pub async fn count_by_kind_on(
        &self,
        work_date: NaiveDate,
    ) -> AppResult<Vec<(AttendanceKind, i64)>> {
        sqlx::query_as::<_, (AttendanceKind, i64)>(
            "SELECT kind, COUNT(*) FROM attendance_records \
             WHERE work_date = $1 GROUP BY kind",
        )
        .bind(work_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count attendance by kind", e)
        })
    }

    /// Sum a user's active seconds within a date range.
    pub async fn total_seconds_in_range(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(active_seconds), 0)::BIGINT FROM attendance_records \
             WHERE user_id = $1 AND work_date BETWEEN $2 AND $3",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sum attendance seconds", e)
        })?;
        Ok(total)
    }

    /// Delete the attendance record for a user on a work date.
    pub async fn delete(&self, user_id: Uuid, work_date: NaiveDate) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM attendance_records WHERE user_id = $1 AND work_date = $2",
        )
        .bind(user_id)
        .bind(work_date)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete attendance record", e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
