//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job scheduler configuration.
///
/// Cron expressions use the six-field `sec min hour day month weekday`
/// format of `tokio-cron-scheduler`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Schedule for the stale session sweep.
    #[serde(default = "default_stale_sweep_cron")]
    pub stale_sweep_cron: String,
    /// Schedule for the midnight auto-checkout of carried-over sessions.
    #[serde(default = "default_auto_checkout_cron")]
    pub auto_checkout_cron: String,
    /// Schedule for the daily attendance rollup.
    #[serde(default = "default_attendance_rollup_cron")]
    pub attendance_rollup_cron: String,
}

fn default_true() -> bool {
    true
}

fn default_stale_sweep_cron() -> String {
    "0 * * * * *".to_string()
}

fn default_auto_checkout_cron() -> String {
    "0 5 0 * * *".to_string()
}

fn default_attendance_rollup_cron() -> String {
    "0 0 1 * * *".to_string()
}
