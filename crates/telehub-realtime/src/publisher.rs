//! Bridges service-layer change events into the feed hub.

use std::sync::Arc;

use telehub_core::events::{ChangeEvent, ChangePublisher};

use crate::hub::FeedHub;

/// [`ChangePublisher`] that fans events out through a [`FeedHub`].
///
/// Delivery is fire-and-forget: sends use bounded per-connection buffers
/// and never block the publishing service call.
#[derive(Debug, Clone)]
pub struct HubPublisher {
    hub: Arc<FeedHub>,
}

impl HubPublisher {
    /// Creates a publisher backed by the given hub.
    pub fn new(hub: Arc<FeedHub>) -> Self {
        Self { hub }
    }
}

impl ChangePublisher for HubPublisher {
    fn publish(&self, event: ChangeEvent) {
        self.hub.dispatch(&event);
    }
}
