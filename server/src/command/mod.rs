//! Command queueing and delivery for the server
//!
//! This module handles:
//! - Per-rover FIFO queues drained atomically on each poll
//! - Assigning command ids
//! - Dual delivery: queue first, then best-effort forward to the rover

mod dispatcher;
mod queue;

pub use dispatcher::{CommandDispatcher, DispatchOutcome};
pub use queue::CommandQueue;
