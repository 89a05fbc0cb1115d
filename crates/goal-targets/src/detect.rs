//! End-to-end helpers: RGB frame in, frame analysis out.

use std::fs;
use std::path::{Path, PathBuf};

use goal_targets_scoring::{FrameAnalysis, GoalDetector, TargetFix};
use image::RgbImage;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::{ConfigError, GoalTargetsConfig};
use crate::segment::segment_rgb;

#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("failed to read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Segment, score and classify one RGB frame.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, cfg), fields(width = img.width(), height = img.height()))
)]
pub fn analyze_rgb(img: &RgbImage, cfg: &GoalTargetsConfig) -> FrameAnalysis {
    let seg = segment_rgb(img, &cfg.threshold, cfg.scoring.min_area);
    let detector = GoalDetector::new(cfg.scoring.clone());
    let mut analysis = detector.analyze(&seg.regions, &seg.labels);
    analysis.rejected_small += seg.filtered_out;
    log::info!(
        "{} regions scored, {} goals, {} rejected as small",
        analysis.classifications.len(),
        analysis.goals().count(),
        analysis.rejected_small
    );
    analysis
}

/// Analysis of one image file, ready to be written as JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub image: PathBuf,
    pub width: u32,
    pub height: u32,
    pub best: Option<TargetFix>,
    pub analysis: FrameAnalysis,
}

impl AnalysisReport {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DetectError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Load an image from disk and analyze it.
pub fn analyze_path(
    path: impl AsRef<Path>,
    cfg: &GoalTargetsConfig,
) -> Result<AnalysisReport, DetectError> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|source| DetectError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let analysis = analyze_rgb(&img, cfg);
    Ok(AnalysisReport {
        image: path.to_path_buf(),
        width: img.width(),
        height: img.height(),
        best: analysis.best_fix(),
        analysis,
    })
}
