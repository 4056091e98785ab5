//! The feed hub — connection registry and event fan-out.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use telehub_core::config::RealtimeConfig;
use telehub_core::events::ChangeEvent;
use telehub_entity::user::UserRole;

use crate::channels::ChannelRegistry;
use crate::connection::{ConnectionHandle, ConnectionId};
use crate::message::{ClientMessage, ServerMessage, TEAM_FEED, user_channel};

/// Central registry of feed connections and their subscriptions.
///
/// Every connection is auto-subscribed to its owner's personal channel.
/// Managers may additionally subscribe to [`TEAM_FEED`] to observe the
/// whole team. Dispatch pushes each change event to the subject user's
/// channel and to the team feed.
#[derive(Debug)]
pub struct FeedHub {
    /// Connection ID → handle.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// User ID → connection handles, oldest first.
    by_user: DashMap<Uuid, Vec<Arc<ConnectionHandle>>>,
    /// Channel subscriptions.
    channels: ChannelRegistry,
    /// Realtime configuration.
    config: RealtimeConfig,
}

impl FeedHub {
    /// Creates a new feed hub.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            by_id: DashMap::new(),
            by_user: DashMap::new(),
            channels: ChannelRegistry::new(),
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the handle and the receiver the transport drains into the
    /// socket. When the user is already at the connection limit, the
    /// oldest connection is closed to make room.
    pub fn register(
        &self,
        user_id: Uuid,
        role: UserRole,
        username: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, role, username, tx));

        let existing = self.user_connections(user_id);
        if existing.len() >= self.config.max_connections_per_user {
            warn!(
                user_id = %user_id,
                count = existing.len(),
                max = self.config.max_connections_per_user,
                "User at connection limit, closing oldest"
            );
            if let Some(oldest) = existing.first() {
                self.unregister(oldest.id);
            }
        }

        self.by_id.insert(handle.id, handle.clone());
        self.by_user.entry(user_id).or_default().push(handle.clone());
        self.channels.subscribe(&user_channel(user_id), handle.id);

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            "Feed connection registered"
        );

        (handle, rx)
    }

    /// Unregisters a connection and drops its subscriptions.
    pub fn unregister(&self, conn_id: ConnectionId) {
        let Some((_, handle)) = self.by_id.remove(&conn_id) else {
            return;
        };
        handle.mark_closed();
        self.channels.unsubscribe_all(conn_id);

        if let Some(mut conns) = self.by_user.get_mut(&handle.user_id) {
            conns.retain(|c| c.id != conn_id);
            if conns.is_empty() {
                drop(conns);
                self.by_user.remove(&handle.user_id);
            }
        }

        info!(conn_id = %conn_id, user_id = %handle.user_id, "Feed connection unregistered");
    }

    /// Processes an inbound client message.
    pub fn handle_message(&self, conn_id: ConnectionId, msg: ClientMessage) {
        let Some(handle) = self.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };
        handle.touch();

        match msg {
            ClientMessage::Subscribe { channel } => {
                if !self.may_subscribe(&handle, &channel) {
                    handle.send(ServerMessage::Error {
                        code: "FORBIDDEN".to_string(),
                        message: format!("Not authorized to subscribe to channel: {channel}"),
                    });
                    return;
                }
                self.channels.subscribe(&channel, conn_id);
                handle.send(ServerMessage::Subscribed {
                    channel: channel.clone(),
                });
                debug!(conn_id = %conn_id, channel = %channel, "Subscribed");
            }
            ClientMessage::Unsubscribe { channel } => {
                self.channels.unsubscribe(&channel, conn_id);
                debug!(conn_id = %conn_id, channel = %channel, "Unsubscribed");
            }
            ClientMessage::Pong { .. } => {}
        }
    }

    /// Pushes a change event to every interested connection.
    ///
    /// The subject user's channel always receives the event, including
    /// the connection that triggered it; clients treat pushed state as
    /// authoritative and overwrite local state with it.
    pub fn dispatch(&self, event: &ChangeEvent) {
        let mut targets: Vec<ConnectionId> = Vec::new();

        let subject = event.subject_user_id();
        targets.extend(self.channels.subscribers(&user_channel(subject)));
        for conn_id in self.channels.subscribers(TEAM_FEED) {
            if !targets.contains(&conn_id) {
                targets.push(conn_id);
            }
        }

        if targets.is_empty() {
            return;
        }

        let msg = ServerMessage::Change {
            event: event.clone(),
        };
        let mut sent = 0usize;
        for conn_id in targets {
            if let Some(handle) = self.get(conn_id) {
                if handle.send(msg.clone()) {
                    sent += 1;
                }
            }
        }

        debug!(event_id = %event.id, recipients = sent, "Change event dispatched");
    }

    /// Sends a keepalive ping to every connection.
    pub fn ping_all(&self) {
        let timestamp = Utc::now().timestamp();
        for entry in self.by_id.iter() {
            entry.value().send(ServerMessage::Ping { timestamp });
        }
    }

    /// Closes connections that have not answered within the ping timeout.
    ///
    /// Returns the number of connections dropped.
    pub fn drop_unresponsive(&self) -> usize {
        let cutoff =
            Utc::now().timestamp() - self.config.ping_timeout_seconds as i64;
        let stale: Vec<ConnectionId> = self
            .by_id
            .iter()
            .filter(|entry| entry.value().last_seen() < cutoff)
            .map(|entry| entry.key().to_owned())
            .collect();

        for conn_id in &stale {
            warn!(conn_id = %conn_id, "Dropping unresponsive feed connection");
            self.unregister(*conn_id);
        }
        stale.len()
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns the number of distinct connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Returns whether a user has at least one live connection.
    pub fn is_user_connected(&self, user_id: Uuid) -> bool {
        !self.user_connections(user_id).is_empty()
    }

    fn get(&self, conn_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(&conn_id).map(|entry| entry.value().clone())
    }

    fn user_connections(&self, user_id: Uuid) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn may_subscribe(&self, handle: &ConnectionHandle, channel: &str) -> bool {
        if channel == user_channel(handle.user_id) {
            return true;
        }
        if channel == TEAM_FEED {
            return handle.role.is_manager_or_above();
        }
        false
    }
}
