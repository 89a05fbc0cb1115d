//! Geometric measurements behind an opaque region handle.
//!
//! The segmentation backend owns whatever image state is needed to measure a
//! region (label maps, binary masks, ...). Scorers only see it through
//! [`RegionMeasurements`], wrapped per region by [`MeasurementAdapter`].

use serde::{Deserialize, Serialize};

use crate::region::{Region, RegionHandle};

/// Errors raised when a region can no longer be measured.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("region {handle} is not known to the current frame")]
    StaleHandle { handle: RegionHandle },
    #[error("region {handle} has zero area")]
    ZeroArea { handle: RegionHandle },
    #[error("region {handle} produced an empty fill profile")]
    EmptyProfile { handle: RegionHandle },
}

/// Sides of the rectangle with the same area and perimeter as a region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquivalentRect {
    pub long_side: f64,
    pub short_side: f64,
}

impl EquivalentRect {
    /// Build from two sides in any order.
    pub fn from_sides(a: f64, b: f64) -> Self {
        Self {
            long_side: a.max(b),
            short_side: a.min(b),
        }
    }

    /// Equivalent rectangle for a shape of the given area and perimeter.
    ///
    /// Solves `l + s = P / 2`, `l * s = A`. When the perimeter is too short for
    /// the area (discriminant below zero) the square of the same area is used.
    pub fn from_area_perimeter(area: f64, perimeter: f64) -> Self {
        let q = perimeter * 0.25;
        let disc = q * q - area;
        if disc <= 0.0 {
            let side = area.max(0.0).sqrt();
            return Self::from_sides(side, side);
        }
        let root = disc.sqrt();
        Self::from_sides(q + root, (q - root).max(0.0))
    }
}

/// Measurement source for the regions of one frame.
pub trait RegionMeasurements {
    /// Equivalent rectangle long/short side of the region, in pixels.
    fn equivalent_rect(&self, region: &Region) -> Result<EquivalentRect, MeasureError>;

    /// Mean fill (0..=1) of each column of the region's bounding box,
    /// left to right.
    fn column_averages(&self, region: &Region) -> Result<Vec<f32>, MeasureError>;

    /// Mean fill (0..=1) of each row of the region's bounding box,
    /// top to bottom.
    fn row_averages(&self, region: &Region) -> Result<Vec<f32>, MeasureError>;
}

impl<T: RegionMeasurements + ?Sized> RegionMeasurements for &T {
    fn equivalent_rect(&self, region: &Region) -> Result<EquivalentRect, MeasureError> {
        (**self).equivalent_rect(region)
    }

    fn column_averages(&self, region: &Region) -> Result<Vec<f32>, MeasureError> {
        (**self).column_averages(region)
    }

    fn row_averages(&self, region: &Region) -> Result<Vec<f32>, MeasureError> {
        (**self).row_averages(region)
    }
}

/// Per-region view over a [`RegionMeasurements`] source.
///
/// Nothing is cached: every call goes back to the source, so the adapter must
/// not outlive the frame it was built for.
pub struct MeasurementAdapter<'a, M: ?Sized> {
    source: &'a M,
    region: &'a Region,
}

impl<'a, M: RegionMeasurements + ?Sized> MeasurementAdapter<'a, M> {
    pub fn new(source: &'a M, region: &'a Region) -> Self {
        Self { source, region }
    }

    #[inline]
    pub fn region(&self) -> &Region {
        self.region
    }

    /// Equivalent rectangle, rejecting zero-area regions up front.
    pub fn equivalent_rect(&self) -> Result<EquivalentRect, MeasureError> {
        if self.region.area == 0 {
            return Err(MeasureError::ZeroArea {
                handle: self.region.handle,
            });
        }
        self.source.equivalent_rect(self.region)
    }

    pub fn long_side(&self) -> Result<f64, MeasureError> {
        Ok(self.equivalent_rect()?.long_side)
    }

    pub fn short_side(&self) -> Result<f64, MeasureError> {
        Ok(self.equivalent_rect()?.short_side)
    }

    #[inline]
    pub fn bbox_width(&self) -> u32 {
        self.region.bbox.width
    }

    #[inline]
    pub fn bbox_height(&self) -> u32 {
        self.region.bbox.height
    }

    pub fn column_averages(&self) -> Result<Vec<f32>, MeasureError> {
        let profile = self.source.column_averages(self.region)?;
        self.non_empty(profile)
    }

    pub fn row_averages(&self) -> Result<Vec<f32>, MeasureError> {
        let profile = self.source.row_averages(self.region)?;
        self.non_empty(profile)
    }

    fn non_empty(&self, profile: Vec<f32>) -> Result<Vec<f32>, MeasureError> {
        if profile.is_empty() {
            return Err(MeasureError::EmptyProfile {
                handle: self.region.handle,
            });
        }
        Ok(profile)
    }
}
