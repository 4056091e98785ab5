//! Attendance record kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a user spent a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attendance_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceKind {
    /// On-site office day.
    Office,
    /// Remote working day, backed by a telework session.
    Telework,
    /// Absent (sick leave, vacation).
    Absence,
    /// Public or company holiday.
    Holiday,
}

impl AttendanceKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::Telework => "telework",
            Self::Absence => "absence",
            Self::Holiday => "holiday",
        }
    }
}

impl fmt::Display for AttendanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttendanceKind {
    type Err = telehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "office" => Ok(Self::Office),
            "telework" => Ok(Self::Telework),
            "absence" => Ok(Self::Absence),
            "holiday" => Ok(Self::Holiday),
            _ => Err(telehub_core::AppError::validation(format!(
                "Invalid attendance kind: '{s}'. Expected one of: office, telework, absence, holiday"
            ))),
        }
    }
}
