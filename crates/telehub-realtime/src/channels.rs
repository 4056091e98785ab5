//! Channel subscription registry.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::connection::ConnectionId;

/// Tracks which connections subscribe to which channels.
///
/// Keeps a reverse index so a closing connection can drop all of its
/// subscriptions without scanning every channel.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    /// Channel name → subscriber connection IDs.
    subscribers: DashMap<String, HashSet<ConnectionId>>,
    /// Connection ID → subscribed channel names.
    by_connection: DashMap<ConnectionId, HashSet<String>>,
}

impl ChannelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a connection to a channel.
    pub fn subscribe(&self, channel: &str, conn_id: ConnectionId) {
        self.subscribers
            .entry(channel.to_string())
            .or_default()
            .insert(conn_id);
        self.by_connection
            .entry(conn_id)
            .or_default()
            .insert(channel.to_string());
    }

    /// Unsubscribes a connection from a channel.
    pub fn unsubscribe(&self, channel: &str, conn_id: ConnectionId) {
        if let Some(mut subs) = self.subscribers.get_mut(channel) {
            subs.remove(&conn_id);
            if subs.is_empty() {
                drop(subs);
                self.subscribers.remove(channel);
            }
        }
        if let Some(mut channels) = self.by_connection.get_mut(&conn_id) {
            channels.remove(channel);
        }
    }

    /// Drops every subscription held by a connection.
    pub fn unsubscribe_all(&self, conn_id: ConnectionId) {
        let Some((_, channels)) = self.by_connection.remove(&conn_id) else {
            return;
        };
        for channel in &channels {
            if let Some(mut subs) = self.subscribers.get_mut(channel) {
                subs.remove(&conn_id);
                if subs.is_empty() {
                    drop(subs);
                    self.subscribers.remove(channel);
                }
            }
        }
    }

    /// Returns the subscriber connection IDs for a channel.
    pub fn subscribers(&self, channel: &str) -> Vec<ConnectionId> {
        self.subscribers
            .get(channel)
            .map(|subs| subs.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the number of channels with at least one subscriber.
    pub fn channel_count(&self) -> usize {
        self.subscribers.len()
    }
}
