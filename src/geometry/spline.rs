//! Spline fitting for backbone geometry.
//!
//! Pure anchor → curve-sample transforms with no frame or SS-type
//! dependencies. Every curve family honors the same contract: for `n >= 4`
//! anchors it returns `(n - 1) * samples_per_segment + 1` samples whose first
//! and last positions are the first and last anchors; shorter inputs pass
//! through unchanged.

use glam::Vec3;

use crate::options::{GeometryOptions, SplineKind};

/// Fewest anchors for which a curve is fitted at all.
pub const MIN_SPLINE_ANCHORS: usize = 4;

/// Half-width of the positional moving-average window (window of 7).
const SMOOTH_RADIUS: usize = 3;

/// A point along the fitted curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    /// Interpolated position.
    pub pos: Vec3,
    /// Global curve parameter in `[0, 1]`.
    pub t: f32,
    /// Index of the anchor span this sample was evaluated on.
    pub segment: usize,
    /// Ordinal of the nearest anchor (non-decreasing along the curve).
    pub residue: usize,
}

/// Curve fitting parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineParams {
    /// Curve family.
    pub kind: SplineKind,
    /// Samples evaluated per anchor span (clamped to at least 1).
    pub samples_per_segment: usize,
    /// Cardinal tension; 0.5 reproduces the standard Catmull-Rom curve.
    pub tension: f32,
    /// Moving-average passes applied after fitting.
    pub smoothing_iterations: usize,
}

impl Default for SplineParams {
    fn default() -> Self {
        Self::from_options(&GeometryOptions::default())
    }
}

impl SplineParams {
    /// Spline parameters from geometry options.
    #[must_use]
    pub fn from_options(geo: &GeometryOptions) -> Self {
        Self {
            kind: geo.spline_kind,
            samples_per_segment: geo.samples_per_segment(),
            tension: geo.spline_tension,
            smoothing_iterations: geo.spline_smoothing_iterations,
        }
    }
}

/// Fit a curve through `anchors`.
///
/// Fewer than [`MIN_SPLINE_ANCHORS`] anchors are returned as-is, one sample
/// per anchor, without smoothing.
#[must_use]
pub fn fit_curve(anchors: &[Vec3], params: &SplineParams) -> Vec<CurveSample> {
    let n = anchors.len();
    if n < MIN_SPLINE_ANCHORS {
        if n > 0 {
            log::warn!("{n} anchors, fewer than {MIN_SPLINE_ANCHORS}: curve not smoothed");
        }
        return passthrough(anchors);
    }

    let spans = params.samples_per_segment.max(1);
    let positions = match params.kind {
        SplineKind::CatmullRom => catmull_rom(anchors, spans, params.tension),
        SplineKind::BSpline => cubic_bspline(anchors, spans),
        SplineKind::Hermite => finite_difference_hermite(anchors, spans),
    };
    let positions = smooth_positions(&positions, params.smoothing_iterations);
    annotate(&positions, spans, n)
}

/// One sample per anchor, positions untouched.
fn passthrough(anchors: &[Vec3]) -> Vec<CurveSample> {
    let n = anchors.len();
    let last_segment = n.saturating_sub(2);
    anchors
        .iter()
        .enumerate()
        .map(|(i, &pos)| CurveSample {
            pos,
            t: if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 },
            segment: i.min(last_segment),
            residue: i,
        })
        .collect()
}

/// Attach curve parameter, span and nearest-anchor metadata.
fn annotate(positions: &[Vec3], spans: usize, n_anchors: usize) -> Vec<CurveSample> {
    let last = positions.len().saturating_sub(1).max(1);
    let last_segment = n_anchors - 2;
    positions
        .iter()
        .enumerate()
        .map(|(k, &pos)| {
            let segment = (k / spans).min(last_segment);
            let local = k - segment * spans;
            let residue = if local * 2 < spans { segment } else { segment + 1 };
            CurveSample {
                pos,
                t: k as f32 / last as f32,
                segment,
                residue,
            }
        })
        .collect()
}

/// Virtual control point mirrored through `end` away from `inner`.
fn reflect(end: Vec3, inner: Vec3) -> Vec3 {
    end * 2.0 - inner
}

/// Cubic Hermite basis evaluated at `t`.
fn hermite(p1: Vec3, m1: Vec3, p2: Vec3, m2: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    p1 * (2.0 * t3 - 3.0 * t2 + 1.0)
        + m1 * (t3 - 2.0 * t2 + t)
        + p2 * (-2.0 * t3 + 3.0 * t2)
        + m2 * (t3 - t2)
}

/// Cardinal Catmull-Rom interpolation (passes through all control points).
fn catmull_rom(points: &[Vec3], spans: usize, tension: f32) -> Vec<Vec3> {
    let n = points.len();
    let mut result = Vec::with_capacity((n - 1) * spans + 1);

    for i in 0..n - 1 {
        let p0 = if i == 0 {
            reflect(points[0], points[1])
        } else {
            points[i - 1]
        };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 >= n {
            reflect(points[n - 1], points[n - 2])
        } else {
            points[i + 2]
        };
        let m1 = (p2 - p0) * tension;
        let m2 = (p3 - p1) * tension;

        for j in 0..spans {
            let t = j as f32 / spans as f32;
            result.push(hermite(p1, m1, p2, m2, t));
        }
    }

    result.push(points[n - 1]);
    result
}

/// Cubic B-spline (smooth approximation). The reflected padding makes the
/// curve start and end exactly on the end anchors.
fn cubic_bspline(points: &[Vec3], spans: usize) -> Vec<Vec3> {
    fn b0(t: f32) -> f32 {
        (1.0 - t).powi(3) / 6.0
    }
    fn b1(t: f32) -> f32 {
        (3.0 * t.powi(3) - 6.0 * t.powi(2) + 4.0) / 6.0
    }
    fn b2(t: f32) -> f32 {
        (-3.0 * t.powi(3) + 3.0 * t.powi(2) + 3.0 * t + 1.0) / 6.0
    }
    fn b3(t: f32) -> f32 {
        t.powi(3) / 6.0
    }

    let n = points.len();
    let mut padded = Vec::with_capacity(n + 2);
    padded.push(reflect(points[0], points[1]));
    padded.extend_from_slice(points);
    padded.push(reflect(points[n - 1], points[n - 2]));

    let mut result = Vec::with_capacity((n - 1) * spans + 1);
    for window in padded.windows(4) {
        let [p0, p1, p2, p3] = [window[0], window[1], window[2], window[3]];
        for j in 0..spans {
            let t = j as f32 / spans as f32;
            result.push(p0 * b0(t) + p1 * b1(t) + p2 * b2(t) + p3 * b3(t));
        }
    }

    result[0] = points[0];
    result.push(points[n - 1]);
    result
}

/// Hermite interpolation with central-difference tangents (one-sided at the
/// chain ends).
fn finite_difference_hermite(points: &[Vec3], spans: usize) -> Vec<Vec3> {
    let n = points.len();
    let tangents: Vec<Vec3> = (0..n)
        .map(|i| {
            if i == 0 {
                points[1] - points[0]
            } else if i == n - 1 {
                points[n - 1] - points[n - 2]
            } else {
                (points[i + 1] - points[i - 1]) * 0.5
            }
        })
        .collect();

    let mut result = Vec::with_capacity((n - 1) * spans + 1);
    for i in 0..n - 1 {
        for j in 0..spans {
            let t = j as f32 / spans as f32;
            result.push(hermite(
                points[i],
                tangents[i],
                points[i + 1],
                tangents[i + 1],
                t,
            ));
        }
    }
    result.push(points[n - 1]);
    result
}

/// Weighted moving average over positions (window of 7, weight
/// `1 / (1 + |offset| * 0.5)`), repeated `iterations` times.
///
/// The end points are held fixed so the curve still starts and ends on its
/// anchors.
#[must_use]
pub fn smooth_positions(positions: &[Vec3], iterations: usize) -> Vec<Vec3> {
    let mut current = positions.to_vec();
    let n = current.len();
    if n < 3 {
        return current;
    }

    for _ in 0..iterations {
        let previous = current.clone();
        for (i, out) in current.iter_mut().enumerate().take(n - 1).skip(1) {
            let lo = i.saturating_sub(SMOOTH_RADIUS);
            let hi = (i + SMOOTH_RADIUS).min(n - 1);
            let mut sum = Vec3::ZERO;
            let mut weight_sum = 0.0;
            for (j, &p) in previous[lo..=hi].iter().enumerate() {
                let offset = (lo + j).abs_diff(i) as f32;
                let w = 1.0 / (1.0 + offset * 0.5);
                sum += p * w;
                weight_sum += w;
            }
            *out = sum / weight_sum;
        }
    }
    current
}

/// Cumulative arc length at every sample (first entry is 0).
#[must_use]
pub fn arc_lengths(samples: &[CurveSample]) -> Vec<f32> {
    let mut total = 0.0;
    let mut lengths = Vec::with_capacity(samples.len());
    for (i, s) in samples.iter().enumerate() {
        if i > 0 {
            total += (s.pos - samples[i - 1].pos).length();
        }
        lengths.push(total);
    }
    lengths
}
