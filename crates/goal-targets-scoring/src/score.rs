//! Per-feature region scorers.
//!
//! Every scorer maps a region to a confidence in `[0, 100]`. Measurement
//! failures never propagate: the affected feature scores 0 so the region can
//! still be reported (and will not classify as a goal).

use goal_targets_core::{
    BoundingBox, EquivalentRect, MeasureError, MeasurementAdapter, Region, RegionMeasurements,
};
use serde::{Deserialize, Serialize};

use crate::classify::Hypothesis;
use crate::edge_profile::EdgeProfile;

/// The five feature scores of one region, each clamped to `[0, 100]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub rectangularity: f32,
    pub aspect_ratio_outer: f32,
    pub aspect_ratio_inner: f32,
    pub x_edge: f32,
    pub y_edge: f32,
}

impl ScoreSet {
    /// Aspect-ratio score for the given hypothesis.
    #[inline]
    pub fn aspect_ratio(&self, hypothesis: Hypothesis) -> f32 {
        match hypothesis {
            Hypothesis::Outer => self.aspect_ratio_outer,
            Hypothesis::Inner => self.aspect_ratio_inner,
        }
    }
}

#[inline]
fn clamp_score(v: f64) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 100.0) as f32
}

/// How well the filled area matches its bounding rectangle.
///
/// `100 * area / (width * height)`; an empty bounding box scores 0.
pub fn score_rectangularity(region: &Region) -> f32 {
    let box_area = region.bbox.area();
    if box_area == 0 {
        return 0.0;
    }
    clamp_score(100.0 * region.area as f64 / box_area as f64)
}

/// Aspect-ratio score for an already measured equivalent rectangle.
///
/// The ratio is taken in the orientation of the bounding box: long / short
/// for a wide box, short / long otherwise, then compared to the ideal ratio
/// of the hypothesis with `100 * (1 - |1 - ratio / ideal|)`.
pub fn score_aspect_ratio_from(
    bbox: &BoundingBox,
    rect: &EquivalentRect,
    hypothesis: Hypothesis,
) -> f32 {
    let ratio = if bbox.is_wide() {
        rect.long_side / rect.short_side
    } else {
        rect.short_side / rect.long_side
    };
    score_ratio(ratio, hypothesis.ideal_aspect_ratio())
}

/// `100 * (1 - |1 - measured / ideal|)`, clamped to `[0, 100]`.
pub fn score_ratio(measured: f64, ideal: f64) -> f32 {
    clamp_score(100.0 * (1.0 - (1.0 - measured / ideal).abs()))
}

/// Column-average fit against [`EdgeProfile::X`]; 0 if unmeasurable.
pub fn score_x_edge<M: RegionMeasurements + ?Sized>(adapter: &MeasurementAdapter<'_, M>) -> f32 {
    match adapter.column_averages() {
        Ok(profile) => EdgeProfile::X.score(&profile),
        Err(err) => measurement_failed("x edge", err),
    }
}

/// Row-average fit against [`EdgeProfile::Y`]; 0 if unmeasurable.
pub fn score_y_edge<M: RegionMeasurements + ?Sized>(adapter: &MeasurementAdapter<'_, M>) -> f32 {
    match adapter.row_averages() {
        Ok(profile) => EdgeProfile::Y.score(&profile),
        Err(err) => measurement_failed("y edge", err),
    }
}

fn measurement_failed(feature: &str, err: MeasureError) -> f32 {
    log::warn!("{feature} score forced to 0: {err}");
    0.0
}

/// Compute all five scores for one region.
///
/// The equivalent rectangle is measured once and shared by both aspect-ratio
/// hypotheses.
pub fn score_region<M: RegionMeasurements + ?Sized>(region: &Region, source: &M) -> ScoreSet {
    let adapter = MeasurementAdapter::new(source, region);
    let (aspect_ratio_outer, aspect_ratio_inner) = match adapter.equivalent_rect() {
        Ok(rect) => (
            score_aspect_ratio_from(&region.bbox, &rect, Hypothesis::Outer),
            score_aspect_ratio_from(&region.bbox, &rect, Hypothesis::Inner),
        ),
        Err(err) => {
            let zero = measurement_failed("aspect ratio", err);
            (zero, zero)
        }
    };
    ScoreSet {
        rectangularity: score_rectangularity(region),
        aspect_ratio_outer,
        aspect_ratio_inner,
        x_edge: score_x_edge(&adapter),
        y_edge: score_y_edge(&adapter),
    }
}
