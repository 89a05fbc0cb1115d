use crate::capability::{
    CaptureSensor, HeadingSensor, Launcher, PositionSensor, TankDrive, TargetSource,
};

/// Hardware capabilities handed to the sequencer for one cycle.
///
/// Owned by the outer lifecycle code; the sequencer keeps no handles between
/// cycles.
pub struct AutoContext<'a> {
    pub drive: &'a mut TankDrive,
    pub gyro: &'a mut dyn HeadingSensor,
    pub encoder: &'a mut dyn PositionSensor,
    pub capture: &'a mut dyn CaptureSensor,
    pub launcher: &'a mut dyn Launcher,
    pub targets: &'a mut dyn TargetSource,
}
