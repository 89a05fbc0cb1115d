use goal_targets_core::{MeasurementAdapter, Region, RegionMeasurements};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::classify::{classify, GoalClass};
use crate::distance::distance_for_region;
use crate::params::ScoringParams;
use crate::score::{score_region, ScoreSet};

/// A region that passed the minimum-area filter.
///
/// Only [`GoalDetector::qualify`] builds these, so everything that reaches
/// the classifier has been checked against `min_area`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualifiedRegion {
    index: usize,
    region: Region,
}

impl QualifiedRegion {
    /// Position of the region in the segmentation order of its frame.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn region(&self) -> &Region {
        &self.region
    }
}

/// Scores, class and distance of one region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub index: usize,
    pub region: Region,
    pub scores: ScoreSet,
    pub class: GoalClass,
    /// Distance in feet; `None` for non-goals or when it could not be measured.
    pub distance_ft: Option<f64>,
}

/// What the sequencer needs to know about the frame's chosen target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetFix {
    pub class: GoalClass,
    /// Normalized centroid, `[0, 1] x [0, 1]`.
    pub centroid: Point2<f32>,
    pub distance_ft: Option<f64>,
}

impl From<&Classification> for TargetFix {
    fn from(c: &Classification) -> Self {
        Self {
            class: c.class,
            centroid: c.region.centroid,
            distance_ft: c.distance_ft,
        }
    }
}

/// Result of analyzing one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// One entry per qualified region, in segmentation order.
    pub classifications: Vec<Classification>,
    /// Regions dropped for being below the minimum area.
    pub rejected_small: usize,
}

impl FrameAnalysis {
    /// First high goal of the frame, else the first middle goal.
    pub fn best(&self) -> Option<&Classification> {
        self.first_of(GoalClass::HighGoal)
            .or_else(|| self.first_of(GoalClass::MiddleGoal))
    }

    pub fn best_fix(&self) -> Option<TargetFix> {
        self.best().map(TargetFix::from)
    }

    /// Every region classified as a goal.
    pub fn goals(&self) -> impl Iterator<Item = &Classification> {
        self.classifications.iter().filter(|c| c.class.is_goal())
    }

    fn first_of(&self, class: GoalClass) -> Option<&Classification> {
        self.classifications.iter().find(|c| c.class == class)
    }
}

/// Frame-level goal detector.
#[derive(Clone, Debug, Default)]
pub struct GoalDetector {
    params: ScoringParams,
}

impl GoalDetector {
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// Accept a region for scoring if its area reaches `min_area`.
    pub fn qualify(&self, index: usize, region: Region) -> Option<QualifiedRegion> {
        if region.area < self.params.min_area {
            log::debug!(
                "region {index} dropped: area {} < {}",
                region.area,
                self.params.min_area
            );
            return None;
        }
        Some(QualifiedRegion { index, region })
    }

    /// Score, classify and (for goals) range a single qualified region.
    pub fn classify_region<M: RegionMeasurements + ?Sized>(
        &self,
        qualified: &QualifiedRegion,
        source: &M,
    ) -> Classification {
        let region = qualified.region();
        let scores = score_region(region, source);
        let class = classify(&scores, &self.params.limits, self.params.tie_break);

        let distance_ft = if class.is_goal() {
            let adapter = MeasurementAdapter::new(source, region);
            match distance_for_region(&adapter, &self.params.camera, class) {
                Ok(d) => Some(d),
                Err(err) => {
                    log::warn!("region {} distance unavailable: {err}", qualified.index());
                    None
                }
            }
        } else {
            None
        };

        log::debug!(
            "region {} is a {class} center=({:.3}, {:.3}) distance={distance_ft:?}",
            qualified.index(),
            region.centroid.x,
            region.centroid.y,
        );
        log::debug!(
            "  rect={:.1} ar_outer={:.1} ar_inner={:.1} x_edge={:.1} y_edge={:.1}",
            scores.rectangularity,
            scores.aspect_ratio_outer,
            scores.aspect_ratio_inner,
            scores.x_edge,
            scores.y_edge,
        );

        Classification {
            index: qualified.index(),
            region: *region,
            scores,
            class,
            distance_ft,
        }
    }

    /// Analyze every region of a frame, in segmentation order.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, regions, source), fields(regions = regions.len()))
    )]
    pub fn analyze<M: RegionMeasurements + ?Sized>(
        &self,
        regions: &[Region],
        source: &M,
    ) -> FrameAnalysis {
        let mut analysis = FrameAnalysis::default();
        for (index, region) in regions.iter().enumerate() {
            match self.qualify(index, *region) {
                Some(qualified) => analysis
                    .classifications
                    .push(self.classify_region(&qualified, source)),
                None => analysis.rejected_small += 1,
            }
        }
        analysis
    }
}
