//! Client-side telework session engine.
//!
//! Wraps the server API behind [`SessionTransport`] and the live change
//! feed behind [`ChangeFeed`], and drives the local session state machine:
//! the elapsed-time tick, the periodic heartbeat with its reference clock,
//! and the durable buffer for heartbeats that could not be delivered.

pub mod feed;
pub mod pending;
pub mod session;
pub mod transport;

pub use feed::{ChangeFeed, WsChangeFeed};
pub use pending::{PendingHeartbeat, PendingHeartbeatStore};
pub use session::{ClientConfig, SessionClient, SessionState};
pub use transport::{HeartbeatReport, HttpTransport, SessionTransport};
