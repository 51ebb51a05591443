//! Rover configuration
//!
//! Defaults suit a rover and server on the same machine; every field can be
//! overridden from the environment.

use roverlink_shared::protocol;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Configuration for the rover process
#[derive(Debug, Clone)]
pub struct RoverConfig {
    /// Identifier this rover reports under
    pub rover_id: String,
    /// Control server base URL
    pub server_url: String,
    /// Shared secret sent as `X-API-Key`
    pub api_key: Option<String>,
    /// Bind address of the rover's own status/command endpoint
    pub listen_addr: String,
    /// Address the server should use to reach this rover
    pub advertise_addr: Option<String>,
    /// Sync loop period
    pub sync_period: Duration,
    /// Timeout for each request to the server
    pub request_timeout: Duration,
    /// Lane corridor half-width for route following
    pub lane_tolerance_m: f64,
    /// Upper bound for motor PWM
    pub max_pwm: i32,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            rover_id: "rover-01".into(),
            server_url: "http://127.0.0.1:8000".into(),
            api_key: None,
            listen_addr: "0.0.0.0:8100".into(),
            advertise_addr: None,
            sync_period: Duration::from_millis(protocol::SYNC_PERIOD_MS),
            request_timeout: Duration::from_millis(protocol::REQUEST_TIMEOUT_MS),
            lane_tolerance_m: protocol::DEFAULT_LANE_TOLERANCE_M,
            max_pwm: protocol::DEFAULT_MAX_PWM,
        }
    }
}

impl RoverConfig {
    /// Defaults overlaid with `ROVER_*` / `CONTROL_SERVER_URL` variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            rover_id: non_empty("ROVER_ID").unwrap_or(defaults.rover_id),
            server_url: non_empty("CONTROL_SERVER_URL").unwrap_or(defaults.server_url),
            api_key: non_empty("ROVER_API_KEY"),
            listen_addr: non_empty("ROVER_LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            advertise_addr: non_empty("ROVER_ADVERTISE_ADDR"),
            sync_period: parse_millis(&lookup, "ROVER_SYNC_PERIOD_MS")
                .unwrap_or(defaults.sync_period),
            request_timeout: parse_millis(&lookup, "ROVER_REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout),
            lane_tolerance_m: parse_var(&lookup, "ROVER_LANE_TOLERANCE_M")
                .unwrap_or(defaults.lane_tolerance_m),
            max_pwm: parse_var(&lookup, "ROVER_MAX_PWM").unwrap_or(defaults.max_pwm),
        }
    }
}

/// Parse a variable, warning and returning `None` when it is malformed
fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring malformed {}={:?}, using default", key, raw);
            None
        }
    }
}

/// Parse a non-zero millisecond duration
fn parse_millis<F>(lookup: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var::<F, u64>(lookup, key)? {
        0 => {
            warn!("Ignoring {}=0, must be positive; using default", key);
            None
        }
        ms => Some(Duration::from_millis(ms)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> RoverConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RoverConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config.rover_id, "rover-01");
        assert_eq!(config.server_url, "http://127.0.0.1:8000");
        assert_eq!(config.sync_period, Duration::from_millis(200));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("ROVER_ID", "rover-07"),
            ("ROVER_API_KEY", "s3cret"),
            ("ROVER_SYNC_PERIOD_MS", "500"),
            ("ROVER_MAX_PWM", "80"),
        ]);
        assert_eq!(config.rover_id, "rover-07");
        assert_eq!(config.api_key.as_deref(), Some("s3cret"));
        assert_eq!(config.sync_period, Duration::from_millis(500));
        assert_eq!(config.max_pwm, 80);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = config_from(&[("ROVER_SYNC_PERIOD_MS", "fast"), ("ROVER_API_KEY", "  ")]);
        assert_eq!(config.sync_period, Duration::from_millis(200));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_zero_durations_fall_back() {
        let config = config_from(&[
            ("ROVER_SYNC_PERIOD_MS", "0"),
            ("ROVER_REQUEST_TIMEOUT_MS", "0"),
        ]);
        assert_eq!(config.sync_period, Duration::from_millis(200));
        assert_eq!(config.request_timeout, Duration::from_millis(2000));
    }
}
