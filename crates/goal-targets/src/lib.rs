//! High-level facade crate for the `goal-targets-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core, scoring and autonomous crates
//! - a JSON configuration bundle ([`GoalTargetsConfig`])
//! - logging setup for binaries ([`logging`])
//! - (feature `image`) an HSV-threshold segmentation stage that turns an RGB
//!   frame into [`Region`](core::Region)s plus a measurement source, and
//!   end-to-end helpers from an image to a [`FrameAnalysis`](scoring::FrameAnalysis)
//!
//! ## Quickstart
//!
//! ```no_run
//! use goal_targets::{detect, GoalTargetsConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = GoalTargetsConfig::default();
//! let img = image::open("frame.png")?.to_rgb8();
//! let analysis = detect::analyze_rgb(&img, &cfg);
//! if let Some(best) = analysis.best() {
//!     println!("{} at {:?} ft", best.class, best.distance_ft);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `goal_targets::core`: regions, measurement adapter, camera model.
//! - `goal_targets::logging`: `env_logger` / `tracing-subscriber` setup.
//! - `goal_targets::scoring`: feature scorers, classifier, distance, detector.
//! - `goal_targets::auto`: capability traits and the autonomous sequencer.
//! - `goal_targets::segment` (feature `image`): threshold + labeling.
//! - `goal_targets::detect` (feature `image`): image to frame analysis.

pub use goal_targets_auto as auto;
pub use goal_targets_core as core;
pub use goal_targets_scoring as scoring;

pub use goal_targets_auto::{AutoContext, AutoState, Sequencer, SequencerConfig, StepOutcome};
pub use goal_targets_core::{BoundingBox, CameraModel, Region, RegionHandle};
pub use goal_targets_scoring::{
    Classification, FrameAnalysis, GoalClass, GoalDetector, ScoreSet, ScoringParams, TargetFix,
};

mod config;
pub mod logging;

pub use config::{ConfigError, GoalTargetsConfig, HsvThreshold};

#[cfg(feature = "image")]
pub mod detect;
#[cfg(feature = "image")]
pub mod segment;
