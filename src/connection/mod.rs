//! Connection to the control server
//!
//! This module handles:
//! - The `ControlLink` seam between the sync loop and the network
//! - The HTTP implementation used in production (status push, command poll)

mod client;
mod link;

pub use client::HttpControlLink;
pub use link::ControlLink;
