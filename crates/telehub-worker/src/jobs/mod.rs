//! Built-in periodic jobs.

pub mod attendance_rollup;
pub mod auto_checkout;
pub mod stale_sweep;

pub use attendance_rollup::AttendanceRollupJob;
pub use auto_checkout::AutoCheckoutJob;
pub use stale_sweep::StaleSweepJob;
