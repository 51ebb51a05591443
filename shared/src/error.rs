//! Protocol-level errors

use thiserror::Error;

/// Errors raised while interpreting wire values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Unknown rover mode: {0}")]
    UnknownMode(String),

    #[error("Unknown PDD state: {0}")]
    UnknownPddState(String),

    #[error("Unknown drive directive: {0}")]
    UnknownDirective(String),

    #[error("Invalid rover address: {0:?}")]
    InvalidAddress(String),
}
