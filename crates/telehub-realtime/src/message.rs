//! Wire message definitions for the change feed socket.

use serde::{Deserialize, Serialize};

use telehub_core::events::ChangeEvent;

/// Name of a user's personal feed channel.
pub fn user_channel(user_id: uuid::Uuid) -> String {
    format!("user:{user_id}")
}

/// Channel carrying every change event (manager view).
pub const TEAM_FEED: &str = "team:feed";

/// Messages sent by the client over the feed socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to a channel.
    Subscribe {
        /// Channel name.
        channel: String,
    },
    /// Unsubscribe from a channel.
    Unsubscribe {
        /// Channel name.
        channel: String,
    },
    /// Pong response to a server ping.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Messages pushed by the server over the feed socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Subscription confirmed.
    Subscribed {
        /// Channel name.
        channel: String,
    },
    /// A domain change event.
    Change {
        /// The event payload.
        event: ChangeEvent,
    },
    /// Server keepalive; the client answers with a pong.
    Ping {
        /// Server timestamp.
        timestamp: i64,
    },
    /// Error report.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}
