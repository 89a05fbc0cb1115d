use goal_targets_core::CameraModel;
use serde::{Deserialize, Serialize};

use crate::classify::{ScoreLimits, TieBreak};

fn default_min_area() -> u32 {
    500
}

/// Configuration for [`GoalDetector`](crate::GoalDetector).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    /// Regions with a smaller filled area (px²) are never scored.
    #[serde(default = "default_min_area")]
    pub min_area: u32,
    #[serde(default)]
    pub limits: ScoreLimits,
    #[serde(default)]
    pub tie_break: TieBreak,
    #[serde(default)]
    pub camera: CameraModel,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            min_area: default_min_area(),
            limits: ScoreLimits::default(),
            tie_break: TieBreak::default(),
            camera: CameraModel::default(),
        }
    }
}
