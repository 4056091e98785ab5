//! Reporting use cases.

pub mod service;

pub use service::{
    DailyTotal, KindCount, OverviewReport, ReportService, StatusCount, WeeklyReport,
};
