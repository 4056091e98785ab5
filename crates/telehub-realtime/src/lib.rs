//! # telehub-realtime
//!
//! WebSocket change feed for TeleHub. Authenticated clients connect once
//! and receive pushed [`ChangeEvent`]s for their own sessions and tasks;
//! managers may additionally subscribe to the team feed. The transport
//! itself (upgrade, socket pumps) lives in the API layer; this crate owns
//! the connection pool, channel subscriptions, and event fan-out.
//!
//! [`ChangeEvent`]: telehub_core::events::ChangeEvent

pub mod channels;
pub mod connection;
pub mod hub;
pub mod message;
pub mod publisher;

pub use connection::{ConnectionHandle, ConnectionId};
pub use hub::FeedHub;
pub use message::{ClientMessage, ServerMessage};
pub use publisher::HubPublisher;
