//! Telework session entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use telehub_core::events::SessionSummary;

use super::activity::SessionActivity;
use super::status::SessionStatus;

/// A telework session: one per user per calendar day at most while open.
///
/// `active_seconds` is the accounting source of truth and only ever grows.
/// Heartbeats report elapsed deltas which are accumulated here; the column
/// is never recomputed from wall-clock differences.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeleworkSession {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user who owns the session.
    pub user_id: Uuid,
    /// The calendar day the session belongs to.
    pub work_date: NaiveDate,
    /// When the session was opened.
    pub check_in: DateTime<Utc>,
    /// When the session was closed. `None` while open.
    pub check_out: Option<DateTime<Utc>>,
    /// Current presence status.
    pub status: SessionStatus,
    /// Accumulated active seconds. Monotonically non-decreasing.
    pub active_seconds: i64,
    /// Last time a heartbeat was applied.
    pub last_heartbeat_at: Option<DateTime<Utc>>,
    /// Whether the session was closed by an admin or the midnight sweep.
    pub forced_checkout: bool,
    /// Append-only activity log.
    pub activities: Json<Vec<SessionActivity>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl TeleworkSession {
    /// Whether the session is still open.
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.check_out.is_some()
    }

    /// Build the authoritative snapshot carried on change events.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            user_id: self.user_id,
            work_date: self.work_date,
            status: self.status.to_string(),
            active_seconds: self.active_seconds,
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::activity::ActivityKind;

    fn open_session() -> TeleworkSession {
        let now = Utc::now();
        TeleworkSession {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            work_date: now.date_naive(),
            check_in: now,
            check_out: None,
            status: SessionStatus::Connected,
            active_seconds: 0,
            last_heartbeat_at: None,
            forced_checkout: false,
            activities: Json(vec![SessionActivity::now(ActivityKind::CheckIn, None)]),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn open_until_checked_out() {
        let mut session = open_session();
        assert!(session.is_open());
        session.check_out = Some(Utc::now());
        assert!(session.is_closed());
    }

    #[test]
    fn summary_reflects_current_state() {
        let session = open_session();
        let summary = session.summary();
        assert_eq!(summary.session_id, session.id);
        assert_eq!(summary.status, "connected");
        assert_eq!(summary.active_seconds, 0);
        assert!(summary.check_out.is_none());
    }
}
