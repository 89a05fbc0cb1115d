//! HSV threshold segmentation into candidate regions.
//!
//! 1. Threshold the RGB frame in HSV space (all channels on 0..=255).
//! 2. Label 8-connected components of the binary mask.
//! 3. Fill the convex hull of each component, so a hollow tape rectangle
//!    becomes solid even with one side occluded.
//! 4. Drop components whose filled area is below `min_area`.
//! 5. Order the survivors by filled area, largest first.
//!
//! The returned [`LabelMap`] keeps the unfilled labels around so edge
//! profiles are measured on the hollow shape while area and equivalent
//! rectangle use the filled one.

use std::collections::HashMap;

use goal_targets_core::{
    BoundingBox, EquivalentRect, MeasureError, Region, RegionHandle, RegionMeasurements,
};
use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::geometry::convex_hull;
use imageproc::point::Point;
use nalgebra::Point2;

use crate::config::HsvThreshold;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("a {width}x{height} mask needs {width}*{height} samples, got {actual}")]
pub struct MaskSizeError {
    pub width: usize,
    pub height: usize,
    pub actual: usize,
}

/// Binary mask, row-major.
#[derive(Clone, Debug)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl Mask {
    /// Wrap row-major samples; `data` must hold exactly `width * height` values.
    pub fn new(width: usize, height: usize, data: Vec<bool>) -> Result<Self, MaskSizeError> {
        if width.checked_mul(height) != Some(data.len()) {
            return Err(MaskSizeError {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
}

/// Convert an RGB pixel to HSV with every channel scaled to 0..=255.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };
    let h_deg = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * ((gf - bf) / delta).rem_euclid(6.0)
    } else if max == gf {
        60.0 * ((bf - rf) / delta + 2.0)
    } else {
        60.0 * ((rf - gf) / delta + 4.0)
    };
    let h = h_deg * 255.0 / 360.0;
    (h.round() as u8, s.round() as u8, v as u8)
}

pub fn threshold_hsv(img: &RgbImage, threshold: &HsvThreshold) -> Mask {
    let data = img
        .pixels()
        .map(|p| {
            let (h, s, v) = rgb_to_hsv(p[0], p[1], p[2]);
            threshold.contains(h, s, v)
        })
        .collect();
    Mask {
        width: img.width() as usize,
        height: img.height() as usize,
        data,
    }
}

/// Inclusive column span of a component on one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    x0: usize,
    x1: usize,
}

impl Span {
    #[inline]
    fn len(self) -> usize {
        self.x1 - self.x0 + 1
    }

    fn overlap(self, other: Option<Span>) -> usize {
        let Some(o) = other else {
            return 0;
        };
        let lo = self.x0.max(o.x0);
        let hi = self.x1.min(o.x1);
        if hi >= lo {
            hi - lo + 1
        } else {
            0
        }
    }
}

#[derive(Clone, Debug)]
struct Component {
    bbox: BoundingBox,
    filled_area: u32,
    filled_perimeter: u32,
}

/// Labels of one frame plus per-component statistics.
///
/// Implements [`RegionMeasurements`] for the regions returned alongside it.
#[derive(Clone, Debug)]
pub struct LabelMap {
    width: usize,
    /// 0 is background; component `k` is labeled `k`.
    labels: Vec<u32>,
    components: HashMap<u32, Component>,
}

impl LabelMap {
    /// Component behind `region`, if `region` was produced with this map.
    ///
    /// Labels restart at 1 every frame, so a handle alone does not identify
    /// the frame: the bounding box and filled area must match too.
    fn component(&self, region: &Region) -> Result<&Component, MeasureError> {
        self.components
            .get(&region.handle.0)
            .filter(|c| c.bbox == region.bbox && c.filled_area == region.area)
            .ok_or(MeasureError::StaleHandle {
                handle: region.handle,
            })
    }

    fn fill_profile(&self, region: &Region, by_column: bool) -> Result<Vec<f32>, MeasureError> {
        let bbox = self.component(region)?.bbox;
        let label = region.handle.0;
        let (x0, y0) = (bbox.x as usize, bbox.y as usize);
        let (w, h) = (bbox.width as usize, bbox.height as usize);
        let (outer, inner) = if by_column { (w, h) } else { (h, w) };
        if outer == 0 || inner == 0 {
            return Err(MeasureError::EmptyProfile {
                handle: region.handle,
            });
        }
        let profile = (0..outer)
            .map(|a| {
                let hits = (0..inner)
                    .filter(|&b| {
                        let (x, y) = if by_column { (x0 + a, y0 + b) } else { (x0 + b, y0 + a) };
                        self.labels[y * self.width + x] == label
                    })
                    .count();
                hits as f32 / inner as f32
            })
            .collect();
        Ok(profile)
    }
}

impl RegionMeasurements for LabelMap {
    fn equivalent_rect(&self, region: &Region) -> Result<EquivalentRect, MeasureError> {
        let c = self.component(region)?;
        if c.filled_area == 0 {
            return Err(MeasureError::ZeroArea {
                handle: region.handle,
            });
        }
        Ok(EquivalentRect::from_area_perimeter(
            c.filled_area as f64,
            c.filled_perimeter as f64,
        ))
    }

    fn column_averages(&self, region: &Region) -> Result<Vec<f32>, MeasureError> {
        self.fill_profile(region, true)
    }

    fn row_averages(&self, region: &Region) -> Result<Vec<f32>, MeasureError> {
        self.fill_profile(region, false)
    }
}

/// Regions of one frame, largest first, and the label map measuring them.
#[derive(Clone, Debug)]
pub struct Segmentation {
    pub regions: Vec<Region>,
    pub labels: LabelMap,
    /// Components dropped by the area filter.
    pub filtered_out: usize,
}

/// Label 8-connected components of `mask` and build regions from them.
pub fn segment_mask(mask: &Mask, min_area: u32) -> Segmentation {
    let (w, h) = (mask.width, mask.height);
    let mut labels = vec![0u32; w * h];
    let mut next_label = 1u32;
    let mut regions = Vec::new();
    let mut components = HashMap::new();
    let mut filtered_out = 0usize;
    let mut stack = Vec::new();

    for start in 0..w * h {
        if !mask.data[start] || labels[start] != 0 {
            continue;
        }
        let label = next_label;
        next_label += 1;

        // Flood fill, recording the row spans of the component.
        let mut raw: HashMap<usize, Span> = HashMap::new();
        labels[start] = label;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            let (x, y) = (idx % w, idx / w);
            raw.entry(y)
                .and_modify(|s| {
                    s.x0 = s.x0.min(x);
                    s.x1 = s.x1.max(x);
                })
                .or_insert(Span { x0: x, x1: x });

            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    let n = ny as usize * w + nx as usize;
                    if mask.data[n] && labels[n] == 0 {
                        labels[n] = label;
                        stack.push(n);
                    }
                }
            }
        }

        let spans = hull_spans(&raw);
        let component = summarize(&spans);
        if component.filled_area < min_area {
            filtered_out += 1;
            continue;
        }

        let (sum_x, sum_y) = spans.iter().fold((0.0f64, 0.0f64), |(sx, sy), (&y, s)| {
            let n = s.len() as f64;
            let mid = (s.x0 + s.x1) as f64 * 0.5;
            (sx + n * mid, sy + n * y as f64)
        });
        let area = component.filled_area as f64;
        let centroid = Point2::new(
            ((sum_x / area + 0.5) / w as f64) as f32,
            ((sum_y / area + 0.5) / h as f64) as f32,
        );

        regions.push(Region {
            handle: RegionHandle(label),
            bbox: component.bbox,
            centroid,
            area: component.filled_area,
        });
        components.insert(label, component);
    }

    regions.sort_by(|a, b| b.area.cmp(&a.area));
    log::debug!(
        "segmentation: {} regions kept, {} below {} px",
        regions.len(),
        filtered_out,
        min_area
    );

    Segmentation {
        regions,
        labels: LabelMap {
            width: w,
            labels,
            components,
        },
        filtered_out,
    }
}

/// Row spans of the filled convex hull of a component.
///
/// Every filled span covers the raw span of its row. A hull that degenerates
/// to a point or a line keeps the raw spans.
fn hull_spans(raw: &HashMap<usize, Span>) -> HashMap<usize, Span> {
    let points: Vec<Point<i32>> = raw
        .iter()
        .flat_map(|(&y, s)| {
            [
                Point::new(s.x0 as i32, y as i32),
                Point::new(s.x1 as i32, y as i32),
            ]
        })
        .collect();
    let mut hull: Vec<Point<i32>> = convex_hull(&points[..]);
    if hull.len() > 1 && hull.first() == hull.last() {
        hull.pop();
    }
    if hull.len() < 3 {
        return raw.clone();
    }

    let x0 = hull.iter().map(|p| p.x).min().unwrap_or(0);
    let x1 = hull.iter().map(|p| p.x).max().unwrap_or(0);
    let y0 = hull.iter().map(|p| p.y).min().unwrap_or(0);
    let y1 = hull.iter().map(|p| p.y).max().unwrap_or(0);
    let (w, h) = ((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32);
    let local: Vec<Point<i32>> = hull
        .iter()
        .map(|p| Point::new(p.x - x0, p.y - y0))
        .collect();
    let mut canvas = GrayImage::new(w, h);
    draw_polygon_mut(&mut canvas, &local, Luma([255u8]));

    let mut filled = raw.clone();
    for ly in 0..h {
        let mut row = (0..w).filter(|&lx| canvas.get_pixel(lx, ly)[0] > 0);
        let Some(first) = row.next() else {
            continue;
        };
        let last = row.last().unwrap_or(first);
        let span = Span {
            x0: (x0 + first as i32) as usize,
            x1: (x0 + last as i32) as usize,
        };
        filled
            .entry((y0 + ly as i32) as usize)
            .and_modify(|s| {
                s.x0 = s.x0.min(span.x0);
                s.x1 = s.x1.max(span.x1);
            })
            .or_insert(span);
    }
    filled
}

/// Bounding box, filled area and filled perimeter from row spans.
///
/// Filled components cover a contiguous range of rows.
fn summarize(spans: &HashMap<usize, Span>) -> Component {
    let y0 = spans.keys().copied().min().unwrap_or(0);
    let y1 = spans.keys().copied().max().unwrap_or(0);
    let x0 = spans.values().map(|s| s.x0).min().unwrap_or(0);
    let x1 = spans.values().map(|s| s.x1).max().unwrap_or(0);

    let mut area = 0usize;
    let mut perimeter = 0usize;
    for y in y0..=y1 {
        let Some(&s) = spans.get(&y) else {
            continue;
        };
        let above = y.checked_sub(1).and_then(|p| spans.get(&p).copied());
        let below = spans.get(&(y + 1)).copied();
        area += s.len();
        perimeter += 2 + (s.len() - s.overlap(above)) + (s.len() - s.overlap(below));
    }

    Component {
        bbox: BoundingBox::new(
            x0 as u32,
            y0 as u32,
            (x1 - x0 + 1) as u32,
            (y1 - y0 + 1) as u32,
        ),
        filled_area: area as u32,
        filled_perimeter: perimeter as u32,
    }
}

/// Threshold and label an RGB frame.
pub fn segment_rgb(img: &RgbImage, threshold: &HsvThreshold, min_area: u32) -> Segmentation {
    segment_mask(&threshold_hsv(img, threshold), min_area)
}
