//! Capability traits for the actuation and sensor layer.
//!
//! Concrete speed controllers, gyros and switches live outside this crate;
//! the sequencer only needs these narrow interfaces.

use goal_targets_scoring::TargetFix;

use crate::error::SensorError;

/// A single motor controller accepting a signed fraction of full scale.
pub trait DriveActuator {
    fn set_speed(&mut self, speed: f32);
}

/// Signed heading in degrees, positive clockwise.
pub trait HeadingSensor {
    fn heading_deg(&mut self) -> Result<f64, SensorError>;
}

/// Position / shaft encoder.
pub trait PositionSensor {
    fn count(&mut self) -> Result<i64, SensorError>;
    fn reset(&mut self);
}

/// Limit switch that closes when a ball is captured.
pub trait CaptureSensor {
    fn captured(&mut self) -> Result<bool, SensorError>;
}

/// Launching mechanism.
pub trait Launcher {
    fn fire(&mut self);
}

/// Per-cycle best target of the current camera frame.
pub trait TargetSource {
    fn acquire(&mut self) -> Option<TargetFix>;
}

impl<F: FnMut() -> Option<TargetFix>> TargetSource for F {
    fn acquire(&mut self) -> Option<TargetFix> {
        self()
    }
}

/// Two-sided drive train; each side may gang several controllers.
#[derive(Default)]
pub struct TankDrive {
    left: Vec<Box<dyn DriveActuator>>,
    right: Vec<Box<dyn DriveActuator>>,
}

impl TankDrive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_left(mut self, actuator: impl DriveActuator + 'static) -> Self {
        self.left.push(Box::new(actuator));
        self
    }

    pub fn with_right(mut self, actuator: impl DriveActuator + 'static) -> Self {
        self.right.push(Box::new(actuator));
        self
    }

    /// Command both sides; speeds are clamped to `[-1, 1]`.
    pub fn set(&mut self, left: f32, right: f32) {
        let left = clamp_speed(left);
        let right = clamp_speed(right);
        for m in &mut self.left {
            m.set_speed(left);
        }
        for m in &mut self.right {
            m.set_speed(right);
        }
    }

    pub fn stop(&mut self) {
        self.set(0.0, 0.0);
    }
}

fn clamp_speed(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-1.0, 1.0)
    }
}
