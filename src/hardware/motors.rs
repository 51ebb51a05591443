//! Motor driver abstraction (TB6612/L298N style differential drive)

use roverlink_shared::{protocol, DriveDirective, MotorState};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MotorController {
    max_pwm: i32,
    state: MotorState,
}

impl Default for MotorController {
    fn default() -> Self {
        Self::new(protocol::DEFAULT_MAX_PWM)
    }
}

impl MotorController {
    pub fn new(max_pwm: i32) -> Self {
        Self {
            max_pwm: max_pwm.max(0),
            state: MotorState::default(),
        }
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Apply a drive directive, clamping speed into `[0, max_pwm]`
    pub fn apply(&mut self, directive: DriveDirective, speed: i32) -> MotorState {
        let s = speed.clamp(0, self.max_pwm);

        self.state = match directive {
            DriveDirective::Forward => MotorState {
                left_pwm: s,
                right_pwm: s,
                command: directive,
            },
            DriveDirective::Backward => MotorState {
                left_pwm: -s,
                right_pwm: -s,
                command: directive,
            },
            DriveDirective::Left => MotorState {
                left_pwm: -s,
                right_pwm: s,
                command: directive,
            },
            DriveDirective::Right => MotorState {
                left_pwm: s,
                right_pwm: -s,
                command: directive,
            },
            DriveDirective::Stop => MotorState::default(),
        };

        debug!(
            "Motors: {} left={} right={}",
            self.state.command, self.state.left_pwm, self.state.right_pwm
        );
        self.state
    }

    /// Zero all outputs immediately
    pub fn emergency_stop(&mut self) -> MotorState {
        self.apply(DriveDirective::Stop, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_is_clamped() {
        let mut motors = MotorController::new(100);
        let state = motors.apply(DriveDirective::Forward, 250);
        assert_eq!((state.left_pwm, state.right_pwm), (100, 100));

        let state = motors.apply(DriveDirective::Forward, -20);
        assert_eq!((state.left_pwm, state.right_pwm), (0, 0));
    }

    #[test]
    fn test_turns_are_differential() {
        let mut motors = MotorController::default();
        let left = motors.apply(DriveDirective::Left, 40);
        assert_eq!((left.left_pwm, left.right_pwm), (-40, 40));

        let right = motors.apply(DriveDirective::Right, 40);
        assert_eq!((right.left_pwm, right.right_pwm), (40, -40));

        let back = motors.apply(DriveDirective::Backward, 40);
        assert_eq!((back.left_pwm, back.right_pwm), (-40, -40));
    }

    #[test]
    fn test_emergency_stop_zeroes_outputs() {
        let mut motors = MotorController::default();
        motors.apply(DriveDirective::Forward, 80);
        let state = motors.emergency_stop();
        assert_eq!(state, MotorState::default());
        assert_eq!(state.command, DriveDirective::Stop);
    }
}
