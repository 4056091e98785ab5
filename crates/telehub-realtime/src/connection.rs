//! Per-connection handles for the feed socket.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use telehub_entity::user::UserRole;

use crate::message::ServerMessage;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// A handle to one connected feed socket.
///
/// Outbound messages go through a bounded channel; the API layer drains
/// the receiving end into the actual WebSocket. Sends never block, so a
/// slow client loses messages rather than stalling the fan-out path.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// User who owns this connection.
    pub user_id: Uuid,
    /// Role at connect time.
    pub role: UserRole,
    /// Username (cached for logs).
    pub username: String,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Sender for outbound messages.
    sender: mpsc::Sender<ServerMessage>,
    /// Last pong or inbound message, as a unix timestamp.
    last_seen: AtomicI64,
    /// Whether the connection is still alive.
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Creates a new connection handle.
    pub fn new(
        user_id: Uuid,
        role: UserRole,
        username: String,
        sender: mpsc::Sender<ServerMessage>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            role,
            username,
            connected_at: now,
            sender,
            last_seen: AtomicI64::new(now.timestamp()),
            alive: AtomicBool::new(true),
        }
    }

    /// Queues a message for this connection.
    ///
    /// Returns `false` when the message was dropped, either because the
    /// buffer is full or the receiving side has gone away.
    pub fn send(&self, msg: ServerMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Feed buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Records client activity.
    pub fn touch(&self) {
        self.last_seen.store(Utc::now().timestamp(), Ordering::Relaxed);
    }

    /// Returns the last time the client was heard from.
    pub fn last_seen(&self) -> i64 {
        self.last_seen.load(Ordering::Relaxed)
    }

    /// Returns whether the connection is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Marks the connection as closed.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
