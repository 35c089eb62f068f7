//! Shared WebSocket adapter state.

use std::sync::Arc;

use crate::outbound::broadcast::BroadcastPublisher;

/// Dependency bundle for the live-update socket.
#[derive(Clone)]
pub struct WsState {
    /// Source of live events.
    pub events: BroadcastPublisher,
    /// Normalised origins allowed to connect.
    pub allowed_origins: Arc<[String]>,
}

impl WsState {
    /// Construct state from the event relay and origin allow-list.
    pub fn new(events: BroadcastPublisher, allowed_origins: Vec<String>) -> Self {
        Self {
            events,
            allowed_origins: allowed_origins.into(),
        }
    }
}
