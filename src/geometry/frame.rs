//! Rotation-minimizing frames along a sampled backbone curve.
//!
//! Frames are propagated with the double reflection method (Wang et al.
//! 2008), which avoids the flips a curvature-based Frenet frame produces on
//! straight or inflecting stretches.

use glam::Vec3;

/// Unit-length / orthogonality tolerance every frame satisfies.
pub const ORTHONORMAL_TOLERANCE: f32 = 1e-2;

/// Squared length below which a step or vector is treated as zero.
const DEGENERATE_EPS: f32 = 1e-10;

/// Deviation at which a frame is re-orthonormalized.
const REPAIR_TOLERANCE: f32 = 1e-3;

/// Position plus an orthonormal (tangent, normal, binormal) basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Curve position.
    pub pos: Vec3,
    /// Unit direction of travel.
    pub tangent: Vec3,
    /// Unit normal, orthogonal to the tangent.
    pub normal: Vec3,
    /// `tangent × normal`.
    pub binormal: Vec3,
}

impl Frame {
    /// Whether all axes are unit length and pairwise orthogonal within
    /// `tolerance`.
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        let unit = |v: Vec3| (v.length() - 1.0).abs() <= tolerance;
        unit(self.tangent)
            && unit(self.normal)
            && unit(self.binormal)
            && self.tangent.dot(self.normal).abs() <= tolerance
            && self.tangent.dot(self.binormal).abs() <= tolerance
            && self.normal.dot(self.binormal).abs() <= tolerance
    }

    /// Gram-Schmidt the normal against the tangent and rebuild the binormal.
    fn orthonormalized(self) -> Self {
        let tangent = self.tangent.try_normalize().unwrap_or(Vec3::Z);
        let normal = project_normal(self.normal, tangent)
            .unwrap_or_else(|| initial_normal(tangent));
        Self {
            pos: self.pos,
            tangent,
            normal,
            binormal: tangent.cross(normal).normalize(),
        }
    }
}

/// Unit tangents by central differences (one-sided at the ends).
///
/// Zero-length differences reuse the nearest valid tangent; a curve with no
/// valid direction at all points along +Z.
#[must_use]
pub fn compute_tangents(positions: &[Vec3]) -> Vec<Vec3> {
    let n = positions.len();
    let raw: Vec<Option<Vec3>> = (0..n)
        .map(|i| {
            let d = if n < 2 {
                Vec3::ZERO
            } else if i == 0 {
                positions[1] - positions[0]
            } else if i == n - 1 {
                positions[i] - positions[i - 1]
            } else {
                positions[i + 1] - positions[i - 1]
            };
            (d.length_squared() > DEGENERATE_EPS).then(|| d.normalize())
        })
        .collect();

    let mut last = raw.iter().flatten().copied().next().unwrap_or(Vec3::Z);
    raw.into_iter()
        .map(|t| {
            if let Some(t) = t {
                last = t;
            }
            last
        })
        .collect()
}

/// Normal for the first frame: the world axis least parallel to `tangent`,
/// made orthogonal to it.
fn initial_normal(tangent: Vec3) -> Vec3 {
    let reference = [Vec3::X, Vec3::Y, Vec3::Z]
        .into_iter()
        .min_by(|a, b| a.dot(tangent).abs().total_cmp(&b.dot(tangent).abs()))
        .unwrap_or(Vec3::X);
    (reference - tangent * tangent.dot(reference)).normalize()
}

/// Remove the tangent component of `normal`, or `None` if nothing is left.
fn project_normal(normal: Vec3, tangent: Vec3) -> Option<Vec3> {
    let projected = normal - tangent * tangent.dot(normal);
    (projected.length_squared() > DEGENERATE_EPS).then(|| projected.normalize())
}

/// Compute rotation-minimizing frames for `positions`.
///
/// A single position yields one frame with an arbitrary orthonormal basis;
/// an empty input yields no frames.
#[must_use]
pub fn generate_frames(positions: &[Vec3]) -> Vec<Frame> {
    if positions.is_empty() {
        return Vec::new();
    }

    let tangents = compute_tangents(positions);
    let t0 = tangents[0];
    let n0 = initial_normal(t0);
    let mut frames = Vec::with_capacity(positions.len());
    frames.push(Frame {
        pos: positions[0],
        tangent: t0,
        normal: n0,
        binormal: t0.cross(n0).normalize(),
    });

    for i in 0..positions.len() - 1 {
        let prev = frames[i];
        let t_i1 = tangents[i + 1];

        let v1 = positions[i + 1] - prev.pos;
        let c1 = v1.dot(v1);

        if c1 < DEGENERATE_EPS {
            // Zero-length step: keep the previous axes.
            let mut next = Frame {
                pos: positions[i + 1],
                tangent: t_i1,
                normal: prev.normal,
                binormal: prev.binormal,
            };
            if !next.is_orthonormal(REPAIR_TOLERANCE) {
                next = next.orthonormalized();
            }
            frames.push(next);
            continue;
        }

        // First reflection
        let r_l = prev.normal - (2.0 / c1) * v1.dot(prev.normal) * v1;
        let t_l = prev.tangent - (2.0 / c1) * v1.dot(prev.tangent) * v1;

        // Second reflection
        let v2 = t_i1 - t_l;
        let c2 = v2.dot(v2);
        let r_i1 = if c2 < DEGENERATE_EPS {
            r_l
        } else {
            r_l - (2.0 / c2) * v2.dot(r_l) * v2
        };

        let normal = project_normal(r_i1, t_i1)
            .or_else(|| project_normal(prev.normal, t_i1))
            .unwrap_or_else(|| initial_normal(t_i1));
        frames.push(Frame {
            pos: positions[i + 1],
            tangent: t_i1,
            normal,
            binormal: t_i1.cross(normal).normalize(),
        });
    }

    enforce_orthonormal(&mut frames);
    frames
}

/// Gaussian-weighted smoothing of frame normals over `window` samples.
///
/// Windows below 3 return the frames unchanged. The first and last
/// `window / 2` frames are held fixed so chain-end orientation survives.
#[must_use]
pub fn smooth_frames(frames: &[Frame], window: usize) -> Vec<Frame> {
    let n = frames.len();
    let half = window / 2;
    if window < 3 || n <= 2 * half {
        return frames.to_vec();
    }

    let sigma = (half as f32 * 0.5).max(0.5);
    let weights: Vec<f32> = (0..=half)
        .map(|d| (-((d * d) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();

    let mut out = frames.to_vec();
    for i in half..n - half {
        let sum: Vec3 = (i - half..=i + half)
            .map(|j| frames[j].normal * weights[j.abs_diff(i)])
            .sum();
        let tangent = frames[i].tangent;
        if let Some(normal) = project_normal(sum, tangent) {
            out[i].normal = normal;
            out[i].binormal = tangent.cross(normal).normalize();
        }
    }

    enforce_orthonormal(&mut out);
    out
}

/// Rotation-minimizing frames with optional normal smoothing
/// (`smoothing_window == 0` disables it).
#[must_use]
pub fn build_frames(positions: &[Vec3], smoothing_window: usize) -> Vec<Frame> {
    let frames = generate_frames(positions);
    if smoothing_window == 0 {
        frames
    } else {
        smooth_frames(&frames, smoothing_window)
    }
}

/// Repair any frame that drifted from orthonormality.
fn enforce_orthonormal(frames: &mut [Frame]) {
    let mut repaired = 0usize;
    for frame in frames.iter_mut() {
        if !frame.is_orthonormal(REPAIR_TOLERANCE) {
            *frame = frame.orthonormalized();
            repaired += 1;
        }
    }
    if repaired > 0 {
        log::warn!("re-orthonormalized {repaired} of {} frames", frames.len());
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn assert_all_orthonormal(frames: &[Frame]) {
        for (i, f) in frames.iter().enumerate() {
            assert!(
                f.is_orthonormal(ORTHONORMAL_TOLERANCE),
                "frame {i} not orthonormal: {f:?}"
            );
        }
    }

    fn helix(n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let a = i as f32 * 0.3;
                Vec3::new(2.3 * a.cos(), 2.3 * a.sin(), 0.25 * i as f32)
            })
            .collect()
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(generate_frames(&[]).is_empty());
        let single = generate_frames(&[Vec3::ONE]);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].pos, Vec3::ONE);
        assert_all_orthonormal(&single);
    }

    #[test]
    fn straight_line_has_constant_frames() {
        let line: Vec<Vec3> =
            (0..20).map(|i| Vec3::new(0.0, 0.0, i as f32)).collect();
        let frames = generate_frames(&line);
        assert_all_orthonormal(&frames);
        for f in &frames {
            assert!((f.tangent - Vec3::Z).length() < 1e-6);
            assert!((f.normal - frames[0].normal).length() < 1e-5);
            assert!((f.binormal - frames[0].binormal).length() < 1e-5);
        }
    }

    #[test]
    fn helix_frames_do_not_flip() {
        let frames = generate_frames(&helix(120));
        assert_all_orthonormal(&frames);
        for pair in frames.windows(2) {
            assert!(pair[0].normal.dot(pair[1].normal) > 0.9);
            assert!(pair[0].binormal.dot(pair[1].binormal) > 0.9);
        }
    }

    #[test]
    fn repeated_positions_keep_previous_axes() {
        let mut pts = helix(10);
        pts.insert(5, pts[4]);
        pts.insert(5, pts[4]);
        let frames = generate_frames(&pts);
        assert_eq!(frames.len(), pts.len());
        assert_all_orthonormal(&frames);
    }

    #[test]
    fn all_coincident_positions_fall_back_to_z() {
        let frames = generate_frames(&[Vec3::ONE; 5]);
        assert_all_orthonormal(&frames);
        assert!(frames.iter().all(|f| f.tangent == Vec3::Z));
    }

    #[test]
    fn tangents_are_unit_and_one_sided_at_ends() {
        let pts = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)];
        let t = compute_tangents(&pts);
        assert!((t[0] - Vec3::X).length() < 1e-6);
        assert!((t[2] - Vec3::Y).length() < 1e-6);
        assert!((t[1].length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn random_walks_stay_orthonormal() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut p = Vec3::ZERO;
            let pts: Vec<Vec3> = (0..60)
                .map(|_| {
                    p += Vec3::new(
                        rng.random_range(-1.0..1.0),
                        rng.random_range(-1.0..1.0),
                        rng.random_range(-1.0..1.0),
                    );
                    p
                })
                .collect();
            let frames = build_frames(&pts, 5);
            assert_eq!(frames.len(), pts.len());
            assert_all_orthonormal(&frames);
        }
    }

    #[test]
    fn smoothing_holds_end_frames() {
        let frames = generate_frames(&helix(40));
        let smoothed = smooth_frames(&frames, 7);
        assert_all_orthonormal(&smoothed);
        for i in (0..3).chain(37..40) {
            assert_eq!(smoothed[i], frames[i]);
        }
    }

    #[test]
    fn small_windows_are_a_no_op() {
        let frames = generate_frames(&helix(10));
        assert_eq!(smooth_frames(&frames, 2), frames);
        assert_eq!(build_frames(&helix(10), 0), frames);
    }
}
