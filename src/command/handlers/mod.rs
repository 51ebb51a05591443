//! Command handlers for different command kinds

mod drive;
mod emergency;
mod mode;
mod route;

pub use drive::handle_drive;
pub use emergency::handle_stop;
pub use mode::handle_set_mode;
pub use route::handle_route;

use crate::hardware::MotorController;
use crate::navigation::Navigator;

/// State a handler is allowed to mutate
#[derive(Debug)]
pub struct HandlerContext<'a> {
    pub navigator: &'a mut Navigator,
    pub motors: &'a mut MotorController,
}
