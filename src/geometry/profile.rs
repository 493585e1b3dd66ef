//! Cross-section profiles driven by secondary structure.
//!
//! Maps each curve sample's structure type to a half-width/half-thickness
//! pair, flares and tapers the end of sheet runs into an arrow, and
//! optionally blends profiles across structure boundaries.

use glam::Vec3;

use crate::options::GeometryOptions;
use crate::secondary_structure::SSType;
use crate::util::easing::{lerp, smoothstep};

/// Fixed half-thickness of helix ribbons in angstroms.
pub const HELIX_HALF_THICKNESS: f32 = 0.125;

/// Samples at the end of a sheet run reshaped into the arrow head.
pub const TRANSITION_WINDOW: usize = 4;

/// Half-thickness at or below which a profile is treated as degenerate.
const DEGENERATE_THICKNESS: f32 = 1e-4;

// ==================== CROSS-SECTION PROFILE ====================

/// Ribbon dimensions at a single curve sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSectionProfile {
    /// Half extent along the frame normal.
    pub half_width: f32,
    /// Half extent along the frame binormal.
    pub half_thickness: f32,
    /// Set on the terminal sample of a sheet arrow.
    pub arrow_tip: bool,
}

impl CrossSectionProfile {
    /// Default profile for a structure type.
    #[must_use]
    pub fn for_ss(ss: SSType, geo: &GeometryOptions) -> Self {
        let (half_width, half_thickness) = match ss {
            SSType::Helix => (geo.helix_width * 0.5, HELIX_HALF_THICKNESS),
            SSType::Sheet => (geo.sheet_width * 0.5, geo.sheet_thickness * 0.5),
            SSType::Coil => (geo.coil_radius, geo.coil_radius),
        };
        Self {
            half_width,
            half_thickness,
            arrow_tip: false,
        }
    }

    /// Component-wise interpolation; the result is never an arrow tip.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            half_width: lerp(self.half_width, other.half_width, t),
            half_thickness: lerp(self.half_thickness, other.half_thickness, t),
            arrow_tip: false,
        }
    }

    /// Whether the profile collapses to a line or point.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.half_thickness <= DEGENERATE_THICKNESS
    }

    /// Larger of the two half extents.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.half_width.max(self.half_thickness)
    }

    /// Offset of the ellipse point at `angle` in the plane spanned by
    /// `normal` (width) and `binormal` (thickness).
    #[must_use]
    pub fn ellipse_offset(&self, normal: Vec3, binormal: Vec3, angle: f32) -> Vec3 {
        normal * (self.half_width * angle.cos())
            + binormal * (self.half_thickness * angle.sin())
    }
}

/// Profile eased from `from`'s default to `to`'s default at `t` in [0, 1],
/// shaped by the configured transition easing.
#[must_use]
pub fn transition_profile(
    from: SSType,
    to: SSType,
    t: f32,
    geo: &GeometryOptions,
) -> CrossSectionProfile {
    let a = CrossSectionProfile::for_ss(from, geo);
    let b = CrossSectionProfile::for_ss(to, geo);
    a.lerp(&b, geo.transition_easing.evaluate(t))
}

// ==================== STRUCTURE RUNS ====================

/// Contiguous samples sharing one structure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SSRun {
    /// Structure type of every sample in the run.
    pub ss_type: SSType,
    /// First sample index.
    pub start: usize,
    /// One past the last sample index.
    pub end: usize,
}

impl SSRun {
    /// Number of samples in the run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the run has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Split per-sample structure types into contiguous runs.
#[must_use]
pub fn runs_by_ss(sample_ss: &[SSType]) -> Vec<SSRun> {
    let Some(&first) = sample_ss.first() else {
        return Vec::new();
    };

    let mut runs = Vec::new();
    let mut current = first;
    let mut start = 0;

    for (i, &ss) in sample_ss.iter().enumerate() {
        if ss != current {
            runs.push(SSRun {
                ss_type: current,
                start,
                end: i,
            });
            current = ss;
            start = i;
        }
    }
    runs.push(SSRun {
        ss_type: current,
        start,
        end: sample_ss.len(),
    });

    runs
}

// ==================== PROFILE GENERATION ====================

/// One profile per curve sample.
#[must_use]
pub fn generate_profiles(
    sample_ss: &[SSType],
    geo: &GeometryOptions,
) -> Vec<CrossSectionProfile> {
    let runs = runs_by_ss(sample_ss);
    let mut profiles: Vec<CrossSectionProfile> = sample_ss
        .iter()
        .map(|&ss| CrossSectionProfile::for_ss(ss, geo))
        .collect();

    let arrowed: Vec<bool> = runs
        .iter()
        .map(|run| {
            let has_arrow = run.ss_type == SSType::Sheet
                && geo.sheet_arrows
                && run.len() > TRANSITION_WINDOW;
            if has_arrow {
                shape_arrow(&mut profiles[run.start..run.end], geo);
            }
            has_arrow
        })
        .collect();

    if geo.transition_samples > 0 {
        for (r, run) in runs.iter().enumerate().skip(1) {
            if arrowed[r] || arrowed[r - 1] {
                continue;
            }
            blend_boundary(&mut profiles, runs[r - 1].ss_type, run, geo);
        }
    }

    retain_thickness(&mut profiles);
    profiles
}

/// Widen then taper the trailing window of a sheet run into an arrow head.
fn shape_arrow(run: &mut [CrossSectionProfile], geo: &GeometryOptions) {
    let n = run.len();
    let window_start = n - TRANSITION_WINDOW;
    let base = run[window_start].half_width;
    let wing = base * geo.arrow_wing_scale;

    let widen = TRANSITION_WINDOW / 2;
    let taper = TRANSITION_WINDOW - widen;

    for j in 0..widen {
        let t = (j + 1) as f32 / widen as f32;
        run[window_start + j].half_width = lerp(base, wing, smoothstep(t));
    }
    for j in 0..taper {
        let t = (j + 1) as f32 / taper as f32;
        run[window_start + widen + j].half_width = lerp(wing, 0.0, t);
    }

    let tip = &mut run[n - 1];
    tip.half_width = 0.0;
    tip.arrow_tip = true;
}

/// Rewrite the leading samples of `run` with profiles eased from `prev`.
fn blend_boundary(
    profiles: &mut [CrossSectionProfile],
    prev: SSType,
    run: &SSRun,
    geo: &GeometryOptions,
) {
    let count = geo.transition_samples.min(run.len());
    for j in 0..count {
        let t = (j + 1) as f32 / (count + 1) as f32;
        profiles[run.start + j] = transition_profile(prev, run.ss_type, t, geo);
    }
}

/// Degenerate half-thickness keeps the previous sample's value.
fn retain_thickness(profiles: &mut [CrossSectionProfile]) {
    let mut retained = 0usize;
    for i in 1..profiles.len() {
        if profiles[i].is_degenerate() && !profiles[i - 1].is_degenerate() {
            profiles[i].half_thickness = profiles[i - 1].half_thickness;
            retained += 1;
        }
    }
    if retained > 0 {
        log::warn!("retained thickness on {retained} degenerate profiles");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo() -> GeometryOptions {
        GeometryOptions::default()
    }

    #[test]
    fn defaults_per_structure_type() {
        let g = geo();
        let helix = CrossSectionProfile::for_ss(SSType::Helix, &g);
        assert_eq!(helix.half_width, 0.7);
        assert_eq!(helix.half_thickness, HELIX_HALF_THICKNESS);

        let coil = CrossSectionProfile::for_ss(SSType::Coil, &g);
        assert_eq!(coil.half_width, coil.half_thickness);
        assert_eq!(coil.radius(), g.coil_radius);

        let sheet = CrossSectionProfile::for_ss(SSType::Sheet, &g);
        assert_eq!(sheet.half_width, 0.8);
        assert!(!sheet.arrow_tip);
    }

    #[test]
    fn runs_split_on_type_change() {
        use SSType::{Coil, Helix, Sheet};
        let runs = runs_by_ss(&[Coil, Helix, Helix, Sheet, Sheet, Sheet, Coil]);
        let spans: Vec<_> =
            runs.iter().map(|r| (r.ss_type, r.start, r.end)).collect();
        assert_eq!(
            spans,
            vec![(Coil, 0, 1), (Helix, 1, 3), (Sheet, 3, 6), (Coil, 6, 7)]
        );
        assert!(runs_by_ss(&[]).is_empty());
    }

    #[test]
    fn ten_sample_sheet_has_one_arrow_tip() {
        let g = geo();
        let profiles = generate_profiles(&[SSType::Sheet; 10], &g);
        assert_eq!(profiles.len(), 10);

        let tips: Vec<_> = profiles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.arrow_tip)
            .collect();
        assert_eq!(tips.len(), 1);
        assert_eq!(tips[0].0, 9);
        assert_eq!(tips[0].1.half_width, 0.0);
        assert!(tips[0].1.half_thickness > 0.0);

        let base = g.sheet_width * 0.5;
        let wing = base * g.arrow_wing_scale;
        for p in &profiles[..6] {
            assert_eq!(p.half_width, base);
        }
        assert!(profiles[6].half_width > base);
        assert!((profiles[7].half_width - wing).abs() < 1e-6);
        assert!(profiles[8].half_width < wing);
        assert!(profiles[8].half_width > 0.0);
    }

    #[test]
    fn short_sheet_runs_stay_uniform() {
        let profiles = generate_profiles(&[SSType::Sheet; TRANSITION_WINDOW], &geo());
        assert!(profiles.iter().all(|p| !p.arrow_tip));
        assert!(profiles.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn arrows_can_be_disabled() {
        let g = GeometryOptions {
            sheet_arrows: false,
            ..geo()
        };
        let profiles = generate_profiles(&[SSType::Sheet; 10], &g);
        assert!(profiles.iter().all(|p| !p.arrow_tip && p.half_width > 0.0));
    }

    #[test]
    fn each_sheet_run_gets_its_own_arrow() {
        let mut ss = vec![SSType::Sheet; 8];
        ss.extend([SSType::Coil; 3]);
        ss.extend([SSType::Sheet; 8]);
        let profiles = generate_profiles(&ss, &geo());
        let tips: Vec<usize> = profiles
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.arrow_tip.then_some(i))
            .collect();
        assert_eq!(tips, vec![7, 18]);
    }

    #[test]
    fn transition_eases_between_defaults() {
        let g = geo();
        let helix = CrossSectionProfile::for_ss(SSType::Helix, &g);
        let coil = CrossSectionProfile::for_ss(SSType::Coil, &g);
        let start = transition_profile(SSType::Helix, SSType::Coil, 0.0, &g);
        assert_eq!(start, helix);
        let end = transition_profile(SSType::Helix, SSType::Coil, 1.0, &g);
        assert!((end.half_width - coil.half_width).abs() < 1e-6);
        assert!((end.half_thickness - coil.half_thickness).abs() < 1e-6);
        let mid = transition_profile(SSType::Helix, SSType::Coil, 0.5, &g);
        let halfway = (helix.half_width + coil.half_width) * 0.5;
        assert!((mid.half_width - halfway).abs() < 1e-6);
    }

    #[test]
    fn boundary_blending_rewrites_leading_samples() {
        let g = GeometryOptions {
            transition_samples: 2,
            ..geo()
        };
        let mut ss = vec![SSType::Coil; 4];
        ss.extend([SSType::Helix; 6]);
        let profiles = generate_profiles(&ss, &g);
        let helix = CrossSectionProfile::for_ss(SSType::Helix, &g);
        let coil = CrossSectionProfile::for_ss(SSType::Coil, &g);

        assert_eq!(profiles[3], coil);
        assert!(profiles[4].half_width > coil.half_width);
        assert!(profiles[4].half_width < profiles[5].half_width);
        assert!(profiles[5].half_width < helix.half_width);
        assert_eq!(profiles[6], helix);
    }

    #[test]
    fn blending_skips_the_run_after_an_arrow() {
        let g = GeometryOptions {
            transition_samples: 2,
            ..geo()
        };
        let mut ss = vec![SSType::Sheet; 8];
        ss.extend([SSType::Coil; 4]);
        let profiles = generate_profiles(&ss, &g);
        let coil = CrossSectionProfile::for_ss(SSType::Coil, &g);
        assert!(profiles[8..].iter().all(|p| *p == coil));
    }

    #[test]
    fn degenerate_thickness_keeps_previous_value() {
        let g = GeometryOptions {
            sheet_thickness: 0.0,
            ..geo()
        };
        let mut ss = vec![SSType::Coil; 2];
        ss.extend([SSType::Sheet; 3]);
        let profiles = generate_profiles(&ss, &g);
        for p in &profiles[2..] {
            assert_eq!(p.half_thickness, g.coil_radius);
        }
    }
}
