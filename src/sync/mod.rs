//! Sync Module
//!
//! The rover's fixed-period protocol driver: read signals, update navigation,
//! push status, pull and apply commands.

mod driver;

pub use driver::SyncLoop;
