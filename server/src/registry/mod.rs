//! Rover registry for the control server
//!
//! This module handles:
//! - The authoritative per-rover record, keyed by rover id
//! - Field-by-field merging of incoming status reports
//! - Recording the outcome of reachability probes

mod model;
mod store;

pub use model::{ConnectionStatus, RoverState, RoverSummary, StatusUpdate};
pub use store::RoverRegistry;
pub(crate) use store::SharedStore;
