//! Emergency stop command handler

use super::HandlerContext;
use crate::command::CommandResult;
use tracing::warn;

/// Handle STOP command
///
/// Ignores direction and speed entirely and zeroes every drive output.
pub fn handle_stop(ctx: &mut HandlerContext<'_>) -> CommandResult {
    warn!("[STOP] Emergency stop requested by operator");
    ctx.motors.emergency_stop();

    CommandResult::Applied {
        message: "Motors stopped".into(),
    }
}
