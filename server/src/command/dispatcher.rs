//! Dual delivery of operator commands

use super::queue::CommandQueue;
use crate::probe::ConnectionProbe;
use crate::registry::RoverRegistry;
use roverlink_shared::WireCommand;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// What happened to one dispatched command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub ok: bool,
    /// Id assigned at enqueue
    pub id: u64,
    /// Direct delivery to the rover succeeded
    pub forwarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_error: Option<String>,
}

/// Queues every command and forwards it when the rover is reachable
///
/// The queue is the guaranteed path. A forwarding failure never removes the
/// queued copy; the rover drops whichever copy arrives second by id.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    registry: RoverRegistry,
    queue: CommandQueue,
    probe: ConnectionProbe,
}

impl CommandDispatcher {
    pub fn new(registry: RoverRegistry, queue: CommandQueue, probe: ConnectionProbe) -> Self {
        Self {
            registry,
            queue,
            probe,
        }
    }

    /// Enqueue `command` for `rover_id`, then try direct delivery
    pub async fn dispatch(&self, rover_id: &str, command: WireCommand) -> DispatchOutcome {
        let command = self.queue.enqueue(rover_id, command).await;
        let id = command.id.unwrap_or_default();
        debug!("Queued {:?} id={} for {}", command.kind, id, rover_id);

        let (forwarded, forward_error) = match self.registry.address_of(rover_id).await {
            Some(address) => match self.probe.forward(&address, &command).await {
                Ok(()) => (true, None),
                Err(e) => {
                    warn!("Forward to {} failed, left queued: {:#}", rover_id, e);
                    (false, Some(format!("{:#}", e)))
                }
            },
            None => (false, None),
        };

        DispatchOutcome {
            ok: true,
            id,
            forwarded,
            forward_error,
        }
    }

    /// Record the goal and dispatch the equivalent route command
    pub async fn set_goal(&self, rover_id: &str, goal: Value) -> DispatchOutcome {
        self.registry.set_goal(rover_id, goal.clone()).await;
        self.dispatch(rover_id, WireCommand::route(goal)).await
    }
}
