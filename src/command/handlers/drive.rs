//! Direct drive command handler

use super::HandlerContext;
use crate::command::CommandResult;
use roverlink_shared::DriveDirective;

/// Handle DRIVE command
pub fn handle_drive(
    ctx: &mut HandlerContext<'_>,
    directive: DriveDirective,
    speed: i32,
) -> CommandResult {
    let state = ctx.motors.apply(directive, speed);

    CommandResult::Applied {
        message: format!(
            "Drive {} (left={}, right={})",
            state.command, state.left_pwm, state.right_pwm
        ),
    }
}
