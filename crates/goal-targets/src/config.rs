//! JSON configuration for the whole pipeline.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use goal_targets_auto::SequencerConfig;
use goal_targets_scoring::ScoringParams;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// HSV acceptance window, every channel on a 0..=255 scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HsvThreshold {
    pub hue: RangeInclusive<u8>,
    pub saturation: RangeInclusive<u8>,
    pub value: RangeInclusive<u8>,
}

impl Default for HsvThreshold {
    /// Green retro-reflective tape under a green ring light.
    fn default() -> Self {
        Self {
            hue: 60..=100,
            saturation: 90..=255,
            value: 20..=255,
        }
    }
}

impl HsvThreshold {
    #[inline]
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        self.hue.contains(&h) && self.saturation.contains(&s) && self.value.contains(&v)
    }
}

/// Segmentation, scoring and sequencer settings in one document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalTargetsConfig {
    #[serde(default)]
    pub threshold: HsvThreshold,
    #[serde(default)]
    pub scoring: ScoringParams,
    #[serde(default)]
    pub sequencer: SequencerConfig,
}

impl GoalTargetsConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
