//! # telehub-core
//!
//! Core crate for TeleHub. Contains configuration schemas, domain change
//! events, pagination/response types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other TeleHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
