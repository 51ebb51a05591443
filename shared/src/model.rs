//! Rover data model shared across the wire

use crate::ProtocolError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Who is in charge of driving the rover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoverMode {
    #[default]
    Manual,
    Auto,
}

impl RoverMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoverMode::Manual => "MANUAL",
            RoverMode::Auto => "AUTO",
        }
    }
}

impl fmt::Display for RoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoverMode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MANUAL" => Ok(RoverMode::Manual),
            "AUTO" => Ok(RoverMode::Auto),
            other => Err(ProtocolError::UnknownMode(other.to_string())),
        }
    }
}

/// Driving-permission state produced by the navigation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PddState {
    OnTrack,
    OffTrack,
    Returning,
    #[default]
    Stop,
}

impl PddState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PddState::OnTrack => "ON_TRACK",
            PddState::OffTrack => "OFF_TRACK",
            PddState::Returning => "RETURNING",
            PddState::Stop => "STOP",
        }
    }
}

impl fmt::Display for PddState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PddState {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON_TRACK" => Ok(PddState::OnTrack),
            "OFF_TRACK" => Ok(PddState::OffTrack),
            "RETURNING" => Ok(PddState::Returning),
            "STOP" => Ok(PddState::Stop),
            other => Err(ProtocolError::UnknownPddState(other.to_string())),
        }
    }
}

/// Direct drive directive for the motor driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriveDirective {
    #[default]
    Stop,
    Forward,
    Backward,
    Left,
    Right,
}

impl DriveDirective {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriveDirective::Stop => "STOP",
            DriveDirective::Forward => "FORWARD",
            DriveDirective::Backward => "BACKWARD",
            DriveDirective::Left => "LEFT",
            DriveDirective::Right => "RIGHT",
        }
    }
}

impl fmt::Display for DriveDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriveDirective {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STOP" => Ok(DriveDirective::Stop),
            "FORWARD" => Ok(DriveDirective::Forward),
            "BACKWARD" => Ok(DriveDirective::Backward),
            "LEFT" => Ok(DriveDirective::Left),
            "RIGHT" => Ok(DriveDirective::Right),
            other => Err(ProtocolError::UnknownDirective(other.to_string())),
        }
    }
}

/// A route coordinate in degrees
///
/// Sent as `[lat, lon]`; `{"lat": .., "lon": ..}` is accepted on input too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WaypointRepr", into = "(f64, f64)")]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WaypointRepr {
    Pair(f64, f64),
    Named { lat: f64, lon: f64 },
}

impl From<WaypointRepr> for Waypoint {
    fn from(repr: WaypointRepr) -> Self {
        match repr {
            WaypointRepr::Pair(lat, lon) | WaypointRepr::Named { lat, lon } => {
                Waypoint { lat, lon }
            }
        }
    }
}

impl From<Waypoint> for (f64, f64) {
    fn from(wp: Waypoint) -> Self {
        (wp.lat, wp.lon)
    }
}

/// Last GPS fix reported by the rover
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GpsFix {
    pub lat: f64,
    pub lon: f64,
    pub speed_mps: f64,
    pub hdop: f64,
}

/// PWM outputs currently applied to the drive motors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotorState {
    pub left_pwm: i32,
    pub right_pwm: i32,
    pub command: DriveDirective,
}

/// A single vision detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub camera_id: String,
}

/// Snapshot the rover pushes to the server every sync cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub rover_id: String,
    pub mode: RoverMode,
    pub pdd_state: PddState,
    pub gps: GpsFix,
    pub motors: MotorState,
    pub streams: BTreeMap<String, String>,
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub route: Vec<Waypoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
