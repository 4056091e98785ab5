//! Telework session configuration.

use serde::{Deserialize, Serialize};

/// Telework session accounting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeleworkConfig {
    /// Expected client heartbeat cadence in seconds.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Seconds without a heartbeat before a session is marked offline.
    #[serde(default = "default_stale_after")]
    pub stale_after_seconds: u64,
    /// Maximum length of an activity note.
    #[serde(default = "default_max_note_length")]
    pub max_activity_note_length: usize,
    /// Default window for session history queries in days.
    #[serde(default = "default_history_days")]
    pub history_default_days: u32,
}

fn default_heartbeat_interval() -> u64 {
    60
}

fn default_stale_after() -> u64 {
    180
}

fn default_max_note_length() -> usize {
    500
}

fn default_history_days() -> u32 {
    30
}
