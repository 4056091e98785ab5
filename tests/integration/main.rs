//! End-to-end API tests.
//!
//! These tests exercise the full HTTP stack against a real PostgreSQL
//! database and are ignored by default. Run them with
//! `cargo test -- --ignored` after starting a local database.

mod helpers;

mod admin_test;
mod attendance_test;
mod auth_test;
mod task_test;
mod telework_test;
mod ws_test;
