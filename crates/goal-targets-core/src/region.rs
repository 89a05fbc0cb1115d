use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a region inside the frame that produced it.
///
/// Handles are only meaningful for the [`RegionMeasurements`](crate::RegionMeasurements)
/// source of the same frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RegionHandle(pub u32);

impl std::fmt::Display for RegionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned bounding box in pixel units.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box area in pixels.
    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// `true` if the box is strictly wider than it is tall.
    #[inline]
    pub fn is_wide(&self) -> bool {
        self.width > self.height
    }
}

/// A candidate target region of one thresholded camera frame.
///
/// Produced by the segmentation stage, immutable afterwards and discarded at
/// the end of the frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub handle: RegionHandle,
    pub bbox: BoundingBox,
    /// Center of mass, normalized to `[0, 1] x [0, 1]` of the frame.
    pub centroid: Point2<f32>,
    /// Filled area in pixels.
    pub area: u32,
}

impl Region {
    /// Fraction of the bounding box covered by the filled area.
    ///
    /// Returns `0.0` for an empty bounding box.
    pub fn fill_ratio(&self) -> f32 {
        let box_area = self.bbox.area();
        if box_area == 0 {
            return 0.0;
        }
        self.area as f32 / box_area as f32
    }
}
