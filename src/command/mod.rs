//! Command interpretation for the rover
//!
//! This module handles:
//! - Turning wire commands into typed commands
//! - Dispatching to the handler for each command kind
//! - Dropping duplicate deliveries of the same server command

mod interpreter;
pub mod handlers;

pub use interpreter::{CommandInterpreter, CommandResult};
