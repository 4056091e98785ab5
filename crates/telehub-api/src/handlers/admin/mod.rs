//! Admin-only route handlers.

pub mod reports;
pub mod sessions;
pub mod users;
