//! Attendance record use cases.

pub mod service;

pub use service::{AttendanceService, SetAttendanceRequest, TeamAttendanceEntry};
