//! # telehub-api
//!
//! HTTP API layer for TeleHub built on Axum.
//!
//! Provides all REST endpoints, the change-feed WebSocket upgrade,
//! middleware (CORS, logging, compression), extractors, DTOs, and
//! error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use router::build_router;
pub use state::AppState;
