//! Per-rover pending command queues

use crate::registry::{RoverRegistry, SharedStore};
use chrono::Utc;
use roverlink_shared::WireCommand;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// FIFO of pending commands per rover
///
/// Shares the registry lock; an unknown rover id behaves as an empty queue.
/// Ids restart at 1 in every process, so each command also carries the
/// process epoch (boot time in microseconds).
#[derive(Debug, Clone)]
pub struct CommandQueue {
    store: SharedStore,
    epoch: u64,
    command_id: Arc<AtomicU64>,
}

impl CommandQueue {
    pub fn new(registry: &RoverRegistry) -> Self {
        let epoch = u64::try_from(Utc::now().timestamp_micros()).unwrap_or_default();
        Self::with_epoch(registry, epoch)
    }

    pub fn with_epoch(registry: &RoverRegistry, epoch: u64) -> Self {
        Self {
            store: registry.shared(),
            epoch,
            command_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Get the next command ID
    fn next_command_id(&self) -> u64 {
        self.command_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Append to the tail of the rover's queue, returning the command with its id
    ///
    /// Ids are taken under the lock, so queue order is id order.
    pub async fn enqueue(&self, rover_id: &str, command: WireCommand) -> WireCommand {
        let mut store = self.store.lock().await;
        let command = command
            .with_id(self.next_command_id())
            .with_epoch(self.epoch);

        store
            .queues
            .entry(rover_id.to_string())
            .or_default()
            .push_back(command.clone());

        command
    }

    /// Take every pending command in arrival order, leaving the queue empty
    pub async fn drain(&self, rover_id: &str) -> Vec<WireCommand> {
        let mut store = self.store.lock().await;
        store
            .queues
            .remove(rover_id)
            .map(Vec::from)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub async fn pending_count(&self, rover_id: &str) -> usize {
        let store = self.store.lock().await;
        store.queues.get(rover_id).map_or(0, |q| q.len())
    }
}
