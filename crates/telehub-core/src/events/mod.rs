//! Domain change events emitted by TeleHub operations.
//!
//! Every mutation of a telework session or task produces a typed change
//! event. Events are handed to a [`ChangePublisher`] and fanned out to
//! connected clients by the real-time engine.

pub mod session;
pub mod task;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use session::{SessionChanged, SessionSummary};
pub use task::TaskEvent;

/// Wrapper for all change events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event (if applicable).
    pub actor_id: Option<Uuid>,
    /// The event payload.
    pub payload: ChangePayload,
}

/// Union of all change event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
#[serde(rename_all = "snake_case")]
pub enum ChangePayload {
    /// A telework session changed.
    Session(SessionChanged),
    /// A task changed.
    Task(TaskEvent),
}

impl ChangeEvent {
    /// Create a new change event.
    pub fn new(actor_id: Option<Uuid>, payload: ChangePayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// The user whose channel should receive this event.
    pub fn subject_user_id(&self) -> Uuid {
        match &self.payload {
            ChangePayload::Session(change) => change.session().user_id,
            ChangePayload::Task(event) => event.assignee_id(),
        }
    }
}

/// Sink for change events.
///
/// Implemented by the real-time engine. Publishing is fire-and-forget;
/// a publisher must never block or fail the calling operation.
pub trait ChangePublisher: Send + Sync {
    /// Publish a change event to all interested subscribers.
    fn publish(&self, event: ChangeEvent);
}

/// A publisher that discards all events.
///
/// Used by the CLI and by tests that do not exercise the change feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

impl ChangePublisher for NullPublisher {
    fn publish(&self, _event: ChangeEvent) {}
}
