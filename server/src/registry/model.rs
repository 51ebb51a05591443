//! Server-side rover records

use chrono::{DateTime, Utc};
use roverlink_shared::{PddState, RoverMode, Waypoint};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Report keys that must never land in a record's extension map
const RESERVED_KEYS: [&str; 3] = ["id", "rover_id", "connection"];

/// Stream descriptors every new record starts with
pub fn default_streams() -> BTreeMap<String, String> {
    [
        ("front", "Front stream"),
        ("rear", "Rear stream"),
        ("left", "Left stream"),
        ("right", "Right stream"),
    ]
    .into_iter()
    .map(|(name, label)| (name.to_string(), label.to_string()))
    .collect()
}

/// Outcome of the most recent reachability probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub online: bool,
    pub checked_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionStatus {
    pub fn online(checked_at: DateTime<Utc>) -> Self {
        Self {
            online: true,
            checked_at,
            error: None,
        }
    }

    pub fn offline(checked_at: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            online: false,
            checked_at,
            error: Some(error.into()),
        }
    }
}

/// Partial status report; absent fields leave the record untouched
#[derive(Debug, Clone, Default)]
pub struct StatusUpdate {
    pub mode: Option<RoverMode>,
    pub pdd_state: Option<PddState>,
    pub gps: Option<Value>,
    pub streams: Option<BTreeMap<String, String>>,
    pub route: Option<Vec<Waypoint>>,
    pub goal: Option<Value>,
    pub address: Option<String>,
    /// Everything else the rover sent (motors, detections, ...)
    pub extra: Map<String, Value>,
}

impl StatusUpdate {
    /// Read a report field by field
    ///
    /// A known field whose value this server cannot read is dropped on its
    /// own; the rest of the report still applies. `None` if the report is
    /// not a JSON object.
    pub fn from_report(report: Value) -> Option<Self> {
        let Value::Object(fields) = report else {
            return None;
        };

        let mut update = Self::default();
        for (key, value) in fields {
            if value.is_null() {
                continue;
            }
            let accepted = match key.as_str() {
                "mode" => read_into(&mut update.mode, value),
                "pdd_state" => read_into(&mut update.pdd_state, value),
                "streams" => read_into(&mut update.streams, value),
                "route" => read_into(&mut update.route, value),
                "address" => read_into(&mut update.address, value),
                "gps" => {
                    update.gps = Some(value);
                    true
                }
                "goal" => {
                    update.goal = Some(value);
                    true
                }
                _ => {
                    update.extra.insert(key.clone(), value);
                    true
                }
            };
            if !accepted {
                debug!("Skipping unreadable report field {:?}", key);
            }
        }

        Some(update)
    }
}

fn read_into<T: DeserializeOwned>(slot: &mut Option<T>, value: Value) -> bool {
    match serde_json::from_value(value) {
        Ok(v) => {
            *slot = Some(v);
            true
        }
        Err(_) => false,
    }
}

/// Authoritative server view of one rover
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoverState {
    pub id: String,
    pub mode: RoverMode,
    pub pdd_state: PddState,
    pub gps: Value,
    pub streams: BTreeMap<String, String>,
    pub route: Vec<Waypoint>,
    pub goal: Option<Value>,
    pub address: Option<String>,
    pub connection: Option<ConnectionStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoverState {
    /// Fresh record: MANUAL/STOP, empty gps, default streams
    pub fn new(id: impl Into<String>, address: Option<String>) -> Self {
        Self {
            id: id.into(),
            mode: RoverMode::Manual,
            pdd_state: PddState::Stop,
            gps: Value::Object(Map::new()),
            streams: default_streams(),
            route: Vec::new(),
            goal: None,
            address,
            connection: None,
            extra: Map::new(),
        }
    }

    /// Overlay the fields present in `update`
    ///
    /// Identity, address and probe outcome are not taken from the report.
    pub fn merge(&mut self, update: StatusUpdate) {
        if let Some(mode) = update.mode {
            self.mode = mode;
        }
        if let Some(pdd_state) = update.pdd_state {
            self.pdd_state = pdd_state;
        }
        if let Some(gps) = update.gps {
            self.gps = gps;
        }
        if let Some(streams) = update.streams {
            self.streams = streams;
        }
        if let Some(route) = update.route {
            self.route = route;
        }
        if let Some(goal) = update.goal {
            self.goal = Some(goal);
        }

        for (key, value) in update.extra {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                self.extra.insert(key, value);
            }
        }
    }

    pub fn summary(&self) -> RoverSummary {
        RoverSummary {
            id: self.id.clone(),
            mode: self.mode,
            pdd_state: self.pdd_state,
            gps: self.gps.clone(),
            address: self.address.clone(),
        }
    }
}

/// Listing projection of a rover record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoverSummary {
    pub id: String,
    pub mode: RoverMode,
    pub pdd_state: PddState,
    pub gps: Value,
    pub address: Option<String>,
}
