//! Hollow-rectangle edge-profile templates.
//!
//! A goal target is a rectangle of reflective tape with an empty middle. Its
//! column averages are close to 1 at the left and right borders and stay
//! around the tape-to-height ratio in between; row averages behave the same
//! way vertically. The templates below bound that envelope per sample
//! position.

const X_MAX: [f32; 24] = [
    1.0, 1.0, 1.0, 1.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5,
    0.5, 1.0, 1.0, 1.0, 1.0,
];

const X_MIN: [f32; 24] = [
    0.4, 0.6, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1,
    0.1, 0.1, 0.1, 0.6, 0.0,
];

const Y_MAX: [f32; 24] = [
    1.0, 1.0, 1.0, 1.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5,
    0.5, 1.0, 1.0, 1.0, 1.0,
];

const Y_MIN: [f32; 48] = [
    0.4, 0.6, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05,
    0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05,
    0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.6, 0.0,
];

/// Upper/lower bound templates for one profile axis.
#[derive(Clone, Copy, Debug)]
pub struct EdgeProfile {
    pub max: &'static [f32],
    pub min: &'static [f32],
}

impl EdgeProfile {
    /// Template for column averages (left to right).
    pub const X: EdgeProfile = EdgeProfile {
        max: &X_MAX,
        min: &X_MIN,
    };

    /// Template for row averages (top to bottom).
    pub const Y: EdgeProfile = EdgeProfile {
        max: &Y_MAX,
        min: &Y_MIN,
    };

    /// Envelope `(min, max)` for sample `i` of a profile with `n` samples.
    ///
    /// The profile is stretched onto each template independently with
    /// `index = i * (len - 1) / n`, so both templates may have different
    /// lengths. Requires `i < n`.
    pub fn envelope(&self, i: usize, n: usize) -> (f32, f32) {
        debug_assert!(i < n);
        (
            self.min[i * (self.min.len() - 1) / n],
            self.max[i * (self.max.len() - 1) / n],
        )
    }

    /// Percentage (0..=100) of profile samples strictly inside the envelope.
    ///
    /// An empty profile scores 0.
    pub fn score(&self, profile: &[f32]) -> f32 {
        let n = profile.len();
        if n == 0 {
            return 0.0;
        }
        let inside = profile
            .iter()
            .enumerate()
            .filter(|&(i, &v)| {
                let (lo, hi) = self.envelope(i, n);
                lo < v && v < hi
            })
            .count();
        100.0 * inside as f32 / n as f32
    }
}
