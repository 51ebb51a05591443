//! Hardware Module
//!
//! Simulated stand-ins for the rover's sensors and actuators. Each exposes
//! only the narrow interface the sync loop consumes.

mod camera;
mod gps;
mod motors;
mod sensors;
mod vision;

pub use camera::CameraHub;
pub use gps::GpsModule;
pub use motors::MotorController;
pub use sensors::UltrasonicSensor;
pub use vision::VisionEngine;

/// All collaborators read by one sync cycle
#[derive(Debug, Default)]
pub struct RoverHardware {
    pub gps: GpsModule,
    pub sonar: UltrasonicSensor,
    pub cameras: CameraHub,
    pub vision: VisionEngine,
}
