//! Autonomous sequencing on top of goal classification.
//!
//! Hardware is reached only through the capability traits in
//! [`capability`], bundled per cycle in an [`AutoContext`] owned by the
//! caller. The [`Sequencer`] is a plain state machine: the caller's periodic
//! loop invokes [`Sequencer::step`] once per cycle.

pub mod capability;

mod config;
mod context;
mod error;
mod sequencer;

pub use capability::{
    CaptureSensor, DriveActuator, HeadingSensor, Launcher, PositionSensor, TankDrive, TargetSource,
};
pub use config::{SensorLimits, SequencerConfig, StateBudgets};
pub use context::AutoContext;
pub use error::{SensorError, SequenceError};
pub use sequencer::{AutoState, Sequencer, StepOutcome};

pub use goal_targets_scoring::{GoalClass, TargetFix};
