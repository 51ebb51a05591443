//! Control server configuration

use roverlink_shared::protocol;
use std::env;
use std::time::Duration;
use tracing::warn;

/// Configuration for the control server process
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP bind address
    pub bind_addr: String,
    /// Shared secret required on rover-originated requests
    pub api_key: Option<String>,
    /// Timeout for probing or forwarding to a rover
    pub probe_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".into(),
            api_key: None,
            probe_timeout: Duration::from_millis(protocol::REQUEST_TIMEOUT_MS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let probe_timeout = match non_empty("CONTROL_PROBE_TIMEOUT_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    warn!("Ignoring invalid CONTROL_PROBE_TIMEOUT_MS={:?}, using default", raw);
                    defaults.probe_timeout
                }
            },
            None => defaults.probe_timeout,
        };

        Self {
            bind_addr: non_empty("CONTROL_SERVER_ADDR").unwrap_or(defaults.bind_addr),
            api_key: non_empty("CONTROL_API_KEY"),
            probe_timeout,
        }
    }
}
