//! Route command handler

use super::HandlerContext;
use crate::command::CommandResult;
use roverlink_shared::Waypoint;

/// Handle ROUTE command
///
/// An empty route is accepted; the navigator then has no target and stops.
pub fn handle_route(ctx: &mut HandlerContext<'_>, waypoints: Vec<Waypoint>) -> CommandResult {
    let count = waypoints.len();
    ctx.navigator.set_route(waypoints);

    CommandResult::Applied {
        message: format!("Route set with {} waypoints", count),
    }
}
