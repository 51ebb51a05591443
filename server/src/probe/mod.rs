//! Direct rover reachability
//!
//! This module handles:
//! - Probing a rover's own `/status` endpoint and recording online/offline
//! - Best-effort forwarding of operator commands to `/command`

mod connection;

pub use connection::ConnectionProbe;
