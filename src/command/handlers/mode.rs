//! Mode switch command handler

use super::HandlerContext;
use crate::command::CommandResult;
use roverlink_shared::RoverMode;

/// Handle SET_MODE command
pub fn handle_set_mode(ctx: &mut HandlerContext<'_>, mode: RoverMode) -> CommandResult {
    let previous = ctx.navigator.mode;
    ctx.navigator.mode = mode;

    CommandResult::Applied {
        message: format!("Mode {} -> {}", previous, mode),
    }
}
