use serde::{Deserialize, Serialize};

/// Fixed camera parameters used by the pinhole distance model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraModel {
    /// Horizontal resolution in pixels (160, 320 or 640 on the usual cameras).
    pub x_resolution: u32,
    /// Horizontal field of view in degrees.
    pub view_angle_deg: f64,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self {
            x_resolution: 320,
            view_angle_deg: 48.0,
        }
    }
}

impl CameraModel {
    /// Axis M1011 field of view.
    pub const AXIS_M1011_VIEW_ANGLE_DEG: f64 = 43.5;

    /// Half of the horizontal field of view, in radians.
    #[inline]
    pub fn half_view_angle_rad(&self) -> f64 {
        (self.view_angle_deg * 0.5).to_radians()
    }
}
