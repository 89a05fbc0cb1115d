use serde::{Deserialize, Serialize};

/// Maximum number of cycles each waiting state may take.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateBudgets {
    pub initial_shot: u32,
    pub centering: u32,
    pub seeking: u32,
    pub repositioning: u32,
}

impl Default for StateBudgets {
    fn default() -> Self {
        Self {
            initial_shot: 500,
            centering: 250,
            seeking: 750,
            repositioning: 250,
        }
    }
}

/// Physically plausible sensor ranges; anything outside is a fault.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorLimits {
    pub max_abs_heading_deg: f64,
    pub max_encoder_count: i64,
}

impl Default for SensorLimits {
    fn default() -> Self {
        Self {
            max_abs_heading_deg: 3600.0,
            max_encoder_count: 1_000_000,
        }
    }
}

/// Sequencer tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Full InitialShot..Shooting passes per autonomous period.
    pub passes: u32,
    /// Encoder count at which the initial drive stops and fires.
    pub initial_shot_counts: i64,
    pub drive_speed: f32,
    pub seek_speed: f32,
    pub turn_speed: f32,
    /// Half-width of the centered window around x = 0.5 (normalized).
    pub center_tolerance: f32,
    /// Reference heading for repositioning, in degrees.
    pub reference_heading_deg: f64,
    pub heading_tolerance_deg: f64,
    pub budgets: StateBudgets,
    pub sensor_limits: SensorLimits,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            passes: 2,
            initial_shot_counts: 1,
            drive_speed: 1.0,
            seek_speed: 1.0,
            turn_speed: 0.5,
            center_tolerance: 0.05,
            reference_heading_deg: 0.0,
            heading_tolerance_deg: 2.0,
            budgets: StateBudgets::default(),
            sensor_limits: SensorLimits::default(),
        }
    }
}
