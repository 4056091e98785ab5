//! Telework session change events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authoritative snapshot of a telework session as of a change.
///
/// Carried on every session event so that receiving clients can replace
/// their local view wholesale instead of patching individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// The session ID.
    pub session_id: Uuid,
    /// The user who owns the session.
    pub user_id: Uuid,
    /// The calendar day the session belongs to.
    pub work_date: NaiveDate,
    /// Current presence status (`connected`, `paused`, `in_meeting`, `offline`).
    pub status: String,
    /// Accumulated active seconds.
    pub active_seconds: i64,
    /// When the session was opened.
    pub check_in: DateTime<Utc>,
    /// When the session was closed, if it has been.
    pub check_out: Option<DateTime<Utc>>,
}

/// Events describing telework session mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionChanged {
    /// A session was opened.
    CheckedIn {
        /// The session as of check-in.
        session: SessionSummary,
    },
    /// A session's status, active time, or activity log changed.
    Updated {
        /// The session after the update.
        session: SessionSummary,
    },
    /// A session was closed.
    CheckedOut {
        /// The session after checkout.
        session: SessionSummary,
        /// Whether the checkout was forced rather than user-initiated.
        forced: bool,
        /// The admin who forced the checkout, if any.
        checked_out_by: Option<Uuid>,
    },
}

impl SessionChanged {
    /// The session snapshot carried by this event.
    pub fn session(&self) -> &SessionSummary {
        match self {
            Self::CheckedIn { session } => session,
            Self::Updated { session } => session,
            Self::CheckedOut { session, .. } => session,
        }
    }

    /// Whether this event terminates the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut { .. })
    }
}
