//! Navigation Module
//!
//! Route following and the per-cycle driving-permission (PDD) state machine.

mod engine;

pub use engine::Navigator;
