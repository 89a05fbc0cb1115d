//! Pinhole-camera distance to a classified goal.

use goal_targets_core::{CameraModel, MeasurementAdapter, RegionMeasurements};

use crate::classify::GoalClass;
use crate::error::DistanceError;

const INCHES_PER_FOOT: f64 = 12.0;

/// Apparent target height: the smaller of the bounding-box height and the
/// equivalent-rectangle short side, which holds up better on skewed targets.
#[inline]
pub fn apparent_height(bbox_height: u32, short_side: f64) -> f64 {
    (bbox_height as f64).min(short_side)
}

/// Distance in feet to a target of known class seen `apparent_height_px`
/// pixels tall.
///
/// `x_res * height_in / (apparent_height_px * 12 * 2 * tan(fov / 2))`
pub fn estimate_distance(
    camera: &CameraModel,
    class: GoalClass,
    apparent_height_px: f64,
) -> Result<f64, DistanceError> {
    let hypothesis = class.hypothesis().ok_or(DistanceError::NotAGoal)?;
    if apparent_height_px.is_nan() || apparent_height_px <= 0.0 {
        return Err(DistanceError::NonPositiveHeight {
            height: apparent_height_px,
        });
    }
    let denom = apparent_height_px * INCHES_PER_FOOT * 2.0 * camera.half_view_angle_rad().tan();
    Ok(camera.x_resolution as f64 * hypothesis.target_height_in() / denom)
}

/// Measure the apparent height of a region and estimate its distance.
pub fn distance_for_region<M: RegionMeasurements + ?Sized>(
    adapter: &MeasurementAdapter<'_, M>,
    camera: &CameraModel,
    class: GoalClass,
) -> Result<f64, DistanceError> {
    if !class.is_goal() {
        return Err(DistanceError::NotAGoal);
    }
    let short_side = adapter.short_side()?;
    estimate_distance(camera, class, apparent_height(adapter.bbox_height(), short_side))
}
