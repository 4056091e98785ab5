//! Attendance record entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::AttendanceKind;

/// One attendance record per user per calendar day.
///
/// Telework records are produced by the nightly rollup from closed
/// telework sessions; office/absence/holiday records are entered through
/// the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// The user the record belongs to.
    pub user_id: Uuid,
    /// The calendar day.
    pub work_date: NaiveDate,
    /// How the day was spent.
    pub kind: AttendanceKind,
    /// Active seconds for telework days, zero otherwise.
    pub active_seconds: i64,
    /// The telework session backing this record, if any.
    pub session_id: Option<Uuid>,
    /// Free-form note.
    pub note: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}
