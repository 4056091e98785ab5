//! Scheduled background jobs for TeleHub.
//!
//! This crate provides:
//! - The [`JobHandler`] trait for periodic maintenance work
//! - A cron scheduler that runs registered handlers on their schedules
//! - Built-in jobs for the stale session sweep, the midnight
//!   auto-checkout, and the daily attendance rollup

pub mod job;
pub mod jobs;
pub mod scheduler;

pub use job::JobHandler;
pub use scheduler::CronScheduler;
