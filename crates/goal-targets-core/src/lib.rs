//! Core types and utilities for goal target scoring.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete camera, image type or segmentation backend: regions
//! come in as plain data plus an opaque handle, and measurements are pulled
//! through the [`RegionMeasurements`] trait.

mod camera;
mod measure;
mod region;

pub use camera::CameraModel;
pub use measure::{EquivalentRect, MeasureError, MeasurementAdapter, RegionMeasurements};
pub use region::{BoundingBox, Region, RegionHandle};
