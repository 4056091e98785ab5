//! Telework session status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Presence status of an open telework session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The user is actively working.
    Connected,
    /// The user paused work (break, lunch).
    Paused,
    /// The user is in a meeting.
    InMeeting,
    /// The client stopped reporting heartbeats.
    Offline,
}

impl SessionStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Paused => "paused",
            Self::InMeeting => "in_meeting",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = telehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "connected" => Ok(Self::Connected),
            "paused" => Ok(Self::Paused),
            "in_meeting" => Ok(Self::InMeeting),
            "offline" => Ok(Self::Offline),
            _ => Err(telehub_core::AppError::validation(format!(
                "Invalid session status: '{s}'. Expected one of: connected, paused, in_meeting, offline"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        assert_eq!(
            "in_meeting".parse::<SessionStatus>().unwrap(),
            SessionStatus::InMeeting
        );
        assert_eq!(SessionStatus::InMeeting.to_string(), "in_meeting");
        assert!("busy".parse::<SessionStatus>().is_err());
    }
}
