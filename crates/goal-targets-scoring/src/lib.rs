//! Target scoring and classification for reflective goal targets.
//!
//! Pipeline for one frame:
//! 1. Drop regions below the minimum area ([`GoalDetector::qualify`]).
//! 2. Score each remaining region: rectangularity, outer/inner aspect ratio,
//!    x/y edge-profile fit ([`score`]).
//! 3. Classify the [`ScoreSet`] against fixed limits ([`classify`]).
//! 4. Estimate the distance to every goal ([`distance`]).
//! 5. Pick the frame's best target: first high goal, else first middle goal.

pub mod classify;
pub mod distance;
pub mod edge_profile;
pub mod score;

mod detector;
mod error;
mod params;

pub use classify::{classify, GoalClass, Hypothesis, ScoreLimits, TieBreak};
pub use detector::{Classification, FrameAnalysis, GoalDetector, QualifiedRegion, TargetFix};
pub use distance::{apparent_height, estimate_distance};
pub use edge_profile::EdgeProfile;
pub use error::DistanceError;
pub use params::ScoringParams;
pub use score::ScoreSet;

pub use goal_targets_core::{BoundingBox, CameraModel, Region, RegionHandle, RegionMeasurements};
