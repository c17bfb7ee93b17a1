//! Runtime event definitions and bus.

use cask_common::ContainerId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Runtime event types.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeEvent {
    /// Container created and its backing process spawned.
    ContainerCreated {
        id: ContainerId,
        pid: u32,
        timestamp: i64,
    },
    /// Container suspended.
    ContainerStopped { id: ContainerId, timestamp: i64 },
    /// Container resumed.
    ContainerStarted { id: ContainerId, timestamp: i64 },
    /// Backing process terminated and reaped.
    ContainerReaped {
        id: ContainerId,
        pid: u32,
        exit_code: Option<i32>,
        timestamp: i64,
    },
    /// Container removed from the registry.
    ContainerDeleted { id: ContainerId, timestamp: i64 },
}

/// Events buffered per subscriber before the oldest are dropped.
pub const EVENT_BUFFER: usize = 256;

/// Fan-out of container lifecycle changes.
///
/// The registry publishes one event per create, stop, start, reap and
/// delete. Publishing never blocks the command loop: a subscriber that falls
/// more than [`EVENT_BUFFER`] events behind sees `RecvError::Lagged` and
/// skips ahead.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RuntimeEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self { sender }
    }
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to current subscribers, if any.
    pub fn publish(&self, event: RuntimeEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("No event subscribers");
        }
    }
}

pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
