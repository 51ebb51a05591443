//! Operator commands
//!
//! Commands travel as a loose `{"type": .., "payload": {..}}` envelope so that
//! older rovers keep working when the server learns new command kinds.
//! [`Command`] is the typed view a rover actually acts on.

use crate::{protocol, DriveDirective, RoverMode, Waypoint};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Command envelope as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCommand {
    /// Server-assigned identifier, used by the rover to drop duplicate deliveries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Identifies the server process that assigned `id`; ids restart with it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<u64>,
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: String,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Map::new())
}

impl WireCommand {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            id: None,
            epoch: None,
            kind: kind.into(),
            payload,
        }
    }

    /// Route command carrying an operator goal as its payload
    pub fn route(goal: Value) -> Self {
        Self::new("route", goal)
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Typed view of this command
    pub fn to_command(&self) -> Command {
        Command::from(self)
    }
}

/// Typed command, one variant per recognized kind
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetMode(RoverMode),
    Route(Vec<Waypoint>),
    Drive { directive: DriveDirective, speed: i32 },
    Stop,
    /// Recognized kind whose payload could not be used
    Malformed { kind: String, reason: String },
    /// Unrecognized kind
    Unknown(String),
}

impl Command {
    /// Whether applying this command has any effect
    pub fn is_noop(&self) -> bool {
        matches!(self, Command::Malformed { .. } | Command::Unknown(_))
    }
}

impl From<&WireCommand> for Command {
    fn from(wire: &WireCommand) -> Self {
        let payload = &wire.payload;

        match wire.kind.as_str() {
            "set_mode" => {
                let mode = payload
                    .get("mode")
                    .and_then(Value::as_str)
                    .and_then(|m| m.parse().ok())
                    .unwrap_or(RoverMode::Manual);
                Command::SetMode(mode)
            }
            "route" => match payload.get("waypoints") {
                None | Some(Value::Null) => Command::Route(Vec::new()),
                Some(raw) => match serde_json::from_value::<Vec<Waypoint>>(raw.clone()) {
                    Ok(waypoints) => Command::Route(waypoints),
                    Err(e) => Command::Malformed {
                        kind: wire.kind.clone(),
                        reason: e.to_string(),
                    },
                },
            },
            "drive" => {
                let directive = payload
                    .get("command")
                    .and_then(Value::as_str)
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(DriveDirective::Stop);
                let speed = payload
                    .get("speed")
                    .and_then(speed_from_value)
                    .unwrap_or(protocol::DEFAULT_DRIVE_SPEED);
                Command::Drive { directive, speed }
            }
            "stop" => Command::Stop,
            other => Command::Unknown(other.to_string()),
        }
    }
}

fn speed_from_value(value: &Value) -> Option<i32> {
    if let Some(v) = value.as_i64() {
        return Some(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32);
    }
    value.as_f64().map(|v| v.round() as i32)
}
