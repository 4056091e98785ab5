//! Telework session lifecycle use cases.

pub mod service;

pub use service::{HeartbeatRequest, TeleworkService};
