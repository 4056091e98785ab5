//! Session activity log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a session activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Free-form note written by the user.
    Note,
    /// The session was opened.
    CheckIn,
    /// The session was closed.
    CheckOut,
    /// The presence status changed.
    StatusChange,
    /// Entry written by the server (forced checkout, stale marking).
    System,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Note => "note",
            Self::CheckIn => "check_in",
            Self::CheckOut => "check_out",
            Self::StatusChange => "status_change",
            Self::System => "system",
        };
        write!(f, "{s}")
    }
}

/// A single append-only entry in a session's activity log.
///
/// Stored as a JSONB array element on the session row. Entries are never
/// updated or removed once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionActivity {
    /// What kind of entry this is.
    pub kind: ActivityKind,
    /// Free-form text attached to the entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// When the entry was recorded.
    pub at: DateTime<Utc>,
}

impl SessionActivity {
    /// Create an entry timestamped now.
    pub fn now(kind: ActivityKind, note: Option<String>) -> Self {
        Self {
            kind,
            note,
            at: Utc::now(),
        }
    }
}
