//! RoverLink Shared Protocol Types
//!
//! This crate provides the wire types exchanged between a rover and the
//! control server: status reports pushed every sync cycle, and the commands
//! the server hands back on each poll.

pub mod command;
pub mod error;
pub mod model;

pub use command::{Command, WireCommand};
pub use error::ProtocolError;
pub use model::*;

/// Protocol parameters shared by the rover and the server
pub mod protocol {
    /// Rover sync loop period in milliseconds
    pub const SYNC_PERIOD_MS: u64 = 200;

    /// Timeout for every HTTP request made by either side
    pub const REQUEST_TIMEOUT_MS: u64 = 2000;

    /// Header carrying the optional shared secret
    pub const API_KEY_HEADER: &str = "X-API-Key";

    /// Distance under which a waypoint counts as reached
    pub const WAYPOINT_REACHED_M: f64 = 2.0;

    /// Default width of the lane corridor around the active waypoint
    pub const DEFAULT_LANE_TOLERANCE_M: f64 = 3.0;

    /// Flat-earth scale from degrees to meters (short distances only)
    pub const DEGREES_TO_METERS: f64 = 111_000.0;

    /// Upper bound of motor PWM output
    pub const DEFAULT_MAX_PWM: i32 = 100;

    /// Speed used by a drive command that does not carry one
    pub const DEFAULT_DRIVE_SPEED: i32 = 30;

    /// Confidence above which a stop-class detection halts the rover
    pub const VISION_STOP_CONFIDENCE: f32 = 0.45;
}

/// Normalize a rover or server address into a base URL
///
/// `host:port` gets an `http://` scheme and any trailing slash is dropped.
pub fn base_url(address: &str) -> Result<String, ProtocolError> {
    let trimmed = address.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ProtocolError::InvalidAddress(address.to_string()));
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("http://{}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_adds_scheme() {
        assert_eq!(base_url("10.0.0.5:8100").unwrap(), "http://10.0.0.5:8100");
    }

    #[test]
    fn test_base_url_keeps_scheme_and_strips_slash() {
        assert_eq!(
            base_url("https://rover.local:8100/").unwrap(),
            "https://rover.local:8100"
        );
    }

    #[test]
    fn test_base_url_rejects_blank() {
        assert!(matches!(base_url("   "), Err(ProtocolError::InvalidAddress(_))));
    }
}
