//! Command interpreter - coerces and dispatches incoming commands

use super::handlers::{self, HandlerContext};
use crate::hardware::MotorController;
use crate::navigation::Navigator;
use roverlink_shared::{Command, WireCommand};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Forwarded ids still waiting for their queued copy
const PENDING_LIMIT: usize = 4096;

/// Result of applying one command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Command changed rover state
    Applied { message: String },
    /// Unknown kind or unusable payload; nothing changed
    Ignored { reason: String },
    /// Same server command already applied through the other delivery path
    Duplicate { id: u64 },
}

/// Applies server-issued commands to the navigator and motors
///
/// Duplicate detection is scoped to the server epoch. Within an epoch the
/// queue hands out ids in order, so once a polled batch has arrived no
/// copy of an id at or below its highest id is ever applied again.
#[derive(Debug, Default)]
pub struct CommandInterpreter {
    epoch: Option<u64>,
    /// Every id up to here arrived through the queue
    delivered_through: u64,
    /// Applied ids above `delivered_through`
    seen: BTreeSet<u64>,
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a single command
    ///
    /// Never fails: anything unrecognized is ignored so that newer servers
    /// can talk to older rovers.
    pub fn apply(
        &mut self,
        wire: &WireCommand,
        navigator: &mut Navigator,
        motors: &mut MotorController,
    ) -> CommandResult {
        if let Some(id) = wire.id {
            if !self.first_delivery(wire.epoch, id) {
                debug!("Dropping duplicate command id={}", id);
                return CommandResult::Duplicate { id };
            }
        }

        let mut ctx = HandlerContext { navigator, motors };

        let result = match wire.to_command() {
            Command::SetMode(mode) => handlers::handle_set_mode(&mut ctx, mode),
            Command::Route(waypoints) => handlers::handle_route(&mut ctx, waypoints),
            Command::Drive { directive, speed } => {
                handlers::handle_drive(&mut ctx, directive, speed)
            }
            Command::Stop => handlers::handle_stop(&mut ctx),
            Command::Malformed { kind, reason } => CommandResult::Ignored {
                reason: format!("Malformed {} payload: {}", kind, reason),
            },
            Command::Unknown(kind) => CommandResult::Ignored {
                reason: format!("Unknown command kind {:?}", kind),
            },
        };

        match &result {
            CommandResult::Applied { message } => {
                info!("Command {:?} applied: {}", wire.kind, message)
            }
            CommandResult::Ignored { reason } => debug!("Command ignored: {}", reason),
            CommandResult::Duplicate { .. } => {}
        }

        result
    }

    /// Note that a polled batch arrived in full
    pub fn mark_delivered(&mut self, batch: &[WireCommand]) {
        let through = batch
            .iter()
            .filter(|c| c.epoch == self.epoch)
            .filter_map(|c| c.id)
            .max();

        if let Some(through) = through.filter(|&t| t > self.delivered_through) {
            self.delivered_through = through;
            self.seen.retain(|&id| id > through);
        }
    }

    fn first_delivery(&mut self, epoch: Option<u64>, id: u64) -> bool {
        if epoch != self.epoch {
            info!("Server epoch changed: {:?} -> {:?}", self.epoch, epoch);
            self.epoch = epoch;
            self.delivered_through = 0;
            self.seen.clear();
        }

        if id <= self.delivered_through || !self.seen.insert(id) {
            return false;
        }
        if self.seen.len() > PENDING_LIMIT {
            self.seen.pop_first();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roverlink_shared::{DriveDirective, PddState, RoverMode};
    use serde_json::json;

    struct Rig {
        interpreter: CommandInterpreter,
        navigator: Navigator,
        motors: MotorController,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                interpreter: CommandInterpreter::new(),
                navigator: Navigator::default(),
                motors: MotorController::new(100),
            }
        }

        fn apply(&mut self, value: serde_json::Value) -> CommandResult {
            let wire: WireCommand = serde_json::from_value(value).unwrap();
            self.interpreter
                .apply(&wire, &mut self.navigator, &mut self.motors)
        }
    }

    /// Command as issued by the server with epoch 7
    fn tagged(id: u64, kind: &str, payload: serde_json::Value) -> serde_json::Value {
        json!({"id": id, "epoch": 7, "type": kind, "payload": payload})
    }

    #[test]
    fn test_set_mode() {
        let mut rig = Rig::new();
        rig.apply(json!({"type": "set_mode", "payload": {"mode": "AUTO"}}));
        assert_eq!(rig.navigator.mode, RoverMode::Auto);

        rig.apply(json!({"type": "set_mode", "payload": {"mode": "bogus"}}));
        assert_eq!(rig.navigator.mode, RoverMode::Manual);
    }

    #[test]
    fn test_route_delegates_to_navigator() {
        let mut rig = Rig::new();
        let result = rig.apply(json!({
            "type": "route",
            "payload": {"waypoints": [[55.0, 37.0], [55.001, 37.001]]}
        }));

        assert!(matches!(result, CommandResult::Applied { .. }));
        assert_eq!(rig.navigator.route().waypoints.len(), 2);
        assert_eq!(rig.navigator.mode, RoverMode::Auto);
        assert_eq!(rig.navigator.pdd_state(), PddState::OnTrack);
    }

    #[test]
    fn test_drive_clamps_and_unknown_directive_stops() {
        let mut rig = Rig::new();
        rig.apply(json!({"type": "drive", "payload": {"command": "FORWARD", "speed": 500}}));
        assert_eq!(rig.motors.state().left_pwm, 100);

        rig.apply(json!({"type": "drive", "payload": {"command": "UP", "speed": 50}}));
        assert_eq!(rig.motors.state().command, DriveDirective::Stop);
        assert_eq!(rig.motors.state().left_pwm, 0);
    }

    #[test]
    fn test_stop_zeroes_motors() {
        let mut rig = Rig::new();
        rig.apply(json!({"type": "drive", "payload": {"command": "RIGHT", "speed": 60}}));
        rig.apply(json!({"type": "stop", "payload": {"speed": 99}}));
        assert_eq!(rig.motors.state().left_pwm, 0);
        assert_eq!(rig.motors.state().right_pwm, 0);
    }

    #[test]
    fn test_unknown_kind_is_ignored() {
        let mut rig = Rig::new();
        let result = rig.apply(json!({"type": "launch", "payload": {"target": "moon"}}));
        assert!(matches!(result, CommandResult::Ignored { .. }));
        assert_eq!(rig.navigator.mode, RoverMode::Manual);
    }

    #[test]
    fn test_duplicate_id_applied_once() {
        let mut rig = Rig::new();
        let cmd = json!({"id": 42, "type": "route", "payload": {"waypoints": [[1.0, 1.0]]}});

        assert!(matches!(rig.apply(cmd.clone()), CommandResult::Applied { .. }));
        rig.navigator.mode = RoverMode::Manual;

        assert_eq!(rig.apply(cmd), CommandResult::Duplicate { id: 42 });
        assert_eq!(rig.navigator.mode, RoverMode::Manual);
    }

    #[test]
    fn test_commands_without_id_always_apply() {
        let mut rig = Rig::new();
        let cmd = json!({"type": "set_mode", "payload": {"mode": "AUTO"}});
        assert!(matches!(rig.apply(cmd.clone()), CommandResult::Applied { .. }));
        assert!(matches!(rig.apply(cmd), CommandResult::Applied { .. }));
    }

    #[test]
    fn test_restarted_server_ids_are_not_duplicates() {
        let mut rig = Rig::new();
        rig.apply(json!({
            "id": 1, "epoch": 100, "type": "set_mode", "payload": {"mode": "AUTO"}
        }));
        assert_eq!(rig.navigator.mode, RoverMode::Auto);

        let result = rig.apply(json!({
            "id": 1, "epoch": 200, "type": "set_mode", "payload": {"mode": "MANUAL"}
        }));
        assert!(matches!(result, CommandResult::Applied { .. }));
        assert_eq!(rig.navigator.mode, RoverMode::Manual);
    }

    #[test]
    fn test_queued_twin_dropped_after_many_forwards() {
        let mut rig = Rig::new();
        let first = tagged(1, "drive", json!({"command": "FORWARD"}));
        rig.apply(first.clone());

        for id in 2..=600 {
            rig.apply(tagged(id, "stop", json!({})));
        }

        assert_eq!(rig.apply(first), CommandResult::Duplicate { id: 1 });
    }

    #[test]
    fn test_late_forward_after_poll_is_dropped() {
        let mut rig = Rig::new();
        let batch: Vec<WireCommand> = [
            tagged(1, "stop", json!({})),
            tagged(2, "set_mode", json!({"mode": "AUTO"})),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();
        for command in &batch {
            rig.interpreter.apply(command, &mut rig.navigator, &mut rig.motors);
        }
        rig.interpreter.mark_delivered(&batch);
        assert!(rig.interpreter.seen.is_empty());

        rig.navigator.mode = RoverMode::Manual;
        let late = rig.apply(tagged(2, "set_mode", json!({"mode": "AUTO"})));
        assert_eq!(late, CommandResult::Duplicate { id: 2 });
        assert_eq!(rig.navigator.mode, RoverMode::Manual);
    }

    #[test]
    fn test_unforwarded_lower_id_still_applies() {
        let mut rig = Rig::new();
        rig.apply(tagged(5, "set_mode", json!({"mode": "AUTO"})));

        let queued = rig.apply(tagged(4, "drive", json!({"command": "LEFT"})));
        assert!(matches!(queued, CommandResult::Applied { .. }));
        assert_eq!(rig.motors.state().command, DriveDirective::Left);

        let twin = rig.apply(tagged(5, "set_mode", json!({"mode": "AUTO"})));
        assert_eq!(twin, CommandResult::Duplicate { id: 5 });
    }

    #[test]
    fn test_pending_ids_are_bounded() {
        let mut interpreter = CommandInterpreter::new();
        for id in 1..=(PENDING_LIMIT as u64 + 10) {
            assert!(interpreter.first_delivery(Some(1), id));
        }
        assert_eq!(interpreter.seen.len(), PENDING_LIMIT);
        assert!(!interpreter.seen.contains(&1));
    }

    #[test]
    fn test_drive_message_uses_wire_name() {
        let mut rig = Rig::new();
        let result = rig.apply(json!({"type": "drive", "payload": {"command": "FORWARD"}}));
        match result {
            CommandResult::Applied { message } => assert!(message.starts_with("Drive FORWARD")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
