//! Extrude cross-section rings along frames into a ribbon mesh, with end
//! caps and sheet arrow heads.

use std::f32::consts::TAU;

use glam::Vec3;

use super::frame::Frame;
use super::mesh::{Mesh, FALLBACK_COLOR};
use super::profile::CrossSectionProfile;
use crate::options::{CrossSectionMode, GeometryOptions};

/// Vertex/shape parameters for [`tessellate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationParams {
    /// Ring shape.
    pub mode: CrossSectionMode,
    /// Vertices per round ring (clamped to at least 3).
    pub ring_verts: usize,
    /// Close open ribbon ends.
    pub end_caps: bool,
    /// Distance from the arrow base to its tip.
    pub arrow_length: f32,
    /// How far the arrow wings reach past the ribbon edge.
    pub wing_extension: f32,
}

impl TessellationParams {
    /// Take tessellation settings from geometry options.
    #[must_use]
    pub fn from_options(geo: &GeometryOptions) -> Self {
        Self {
            mode: geo.cross_section_mode,
            ring_verts: geo.ring_verts(),
            end_caps: geo.end_caps,
            arrow_length: geo.arrow_length,
            wing_extension: geo.arrow_wing_extension,
        }
    }

    /// Vertices emitted per ring for the configured mode.
    #[must_use]
    pub fn verts_per_ring(&self) -> usize {
        match self.mode {
            CrossSectionMode::Rectangle => 4,
            CrossSectionMode::Circle | CrossSectionMode::Ellipse => {
                self.ring_verts.max(3)
            }
        }
    }
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self::from_options(&GeometryOptions::default())
    }
}

// ==================== CROSS-SECTION RINGS ====================

/// Ring vertex offsets (relative to the frame position) and outward normals.
fn ring(
    frame: &Frame,
    profile: &CrossSectionProfile,
    params: &TessellationParams,
) -> Vec<(Vec3, Vec3)> {
    let (n, b) = (frame.normal, frame.binormal);
    let (hw, ht) = (profile.half_width, profile.half_thickness);

    match params.mode {
        CrossSectionMode::Rectangle => [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)]
            .into_iter()
            .map(|(sn, sb): (f32, f32)| {
                let offset = n * (sn * hw) + b * (sb * ht);
                (offset, (n * sn + b * sb).normalize())
            })
            .collect(),
        CrossSectionMode::Circle => {
            let r = profile.radius();
            let verts = params.verts_per_ring();
            (0..verts)
                .map(|k| {
                    let angle = k as f32 / verts as f32 * TAU;
                    let radial = n * angle.cos() + b * angle.sin();
                    (radial * r, radial)
                })
                .collect()
        }
        CrossSectionMode::Ellipse => {
            let verts = params.verts_per_ring();
            (0..verts)
                .map(|k| {
                    let angle = k as f32 / verts as f32 * TAU;
                    let (sin_a, cos_a) = angle.sin_cos();
                    let offset = profile.ellipse_offset(n, b, angle);
                    // Gradient of the implicit ellipse, scaled by hw·ht.
                    let normal = (n * (ht * cos_a) + b * (hw * sin_a))
                        .try_normalize()
                        .unwrap_or_else(|| n * cos_a + b * sin_a);
                    (offset, normal)
                })
                .collect()
        }
    }
}

// ==================== BODY ====================

/// Contiguous run of frames extruded as one tube.
#[derive(Debug, Clone, Copy)]
struct Piece {
    start: usize,
    end: usize,
    /// Index of the arrow-tip frame that terminates this piece.
    arrow_tip: Option<usize>,
}

/// Split the frame range at arrow-tip frames.
///
/// A piece followed by an arrow ends at the flare peak, the widest frame
/// before the taper; the arrow wedge covers the taper and the tip frame.
fn split_pieces(profiles: &[CrossSectionProfile]) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (k, profile) in profiles.iter().enumerate() {
        if profile.arrow_tip {
            if k > start {
                pieces.push(Piece {
                    start,
                    end: flare_peak(profiles, start, k),
                    arrow_tip: Some(k),
                });
            }
            start = k + 1;
        }
    }
    if start < profiles.len() {
        pieces.push(Piece {
            start,
            end: profiles.len() - 1,
            arrow_tip: None,
        });
    }
    pieces
}

/// Walk back from the frame before `tip` while the half-width keeps
/// growing, stopping no earlier than `start`.
fn flare_peak(profiles: &[CrossSectionProfile], start: usize, tip: usize) -> usize {
    let mut peak = tip - 1;
    while peak > start && profiles[peak - 1].half_width > profiles[peak].half_width {
        peak -= 1;
    }
    peak
}

/// Tessellate frames and their profiles into a triangle mesh.
///
/// `colors` is per frame; frames past its end reuse the last color, and an
/// empty slice paints everything neutral grey. Fewer than two frames yield
/// an empty mesh.
#[must_use]
pub fn tessellate(
    frames: &[Frame],
    profiles: &[CrossSectionProfile],
    colors: &[[f32; 3]],
    params: &TessellationParams,
) -> Mesh {
    let n = frames.len().min(profiles.len());
    if frames.len() != profiles.len() {
        log::warn!(
            "{} frames but {} profiles, tessellating the first {n}",
            frames.len(),
            profiles.len()
        );
    }
    if n < 2 {
        return Mesh::new();
    }
    let frames = &frames[..n];
    let profiles = &profiles[..n];
    let color_at = |i: usize| {
        colors
            .get(i)
            .or_else(|| colors.last())
            .copied()
            .unwrap_or(FALLBACK_COLOR)
    };

    let verts = params.verts_per_ring();
    let mut mesh = Mesh::with_capacity(n * verts, n * verts * 6);

    for piece in split_pieces(profiles) {
        let len = piece.end - piece.start + 1;
        if len >= 2 {
            let rings: Vec<u32> = (piece.start..=piece.end)
                .map(|i| {
                    let base = mesh.vertex_count() as u32;
                    for (offset, normal) in ring(&frames[i], &profiles[i], params) {
                        let _ = mesh.push_vertex(frames[i].pos + offset, normal, color_at(i));
                    }
                    base
                })
                .collect();
            emit_body(&mut mesh, &rings, verts);

            if params.end_caps {
                let s = piece.start;
                emit_cap(
                    &mut mesh,
                    &frames[s],
                    &profiles[s],
                    color_at(s),
                    params,
                    false,
                );
                if piece.arrow_tip.is_none() {
                    let e = piece.end;
                    emit_cap(
                        &mut mesh,
                        &frames[e],
                        &profiles[e],
                        color_at(e),
                        params,
                        true,
                    );
                }
            }
        }

        if let Some(tip) = piece.arrow_tip {
            let base = piece.end;
            let wedge = arrow_wedge(
                &frames[base],
                &profiles[base],
                frames[tip].pos,
                color_at(base),
                params,
            );
            mesh.append(&wedge);
        }
    }

    mesh
}

/// Two triangles per angular segment between consecutive rings.
fn emit_body(mesh: &mut Mesh, rings: &[u32], verts: usize) {
    for pair in rings.windows(2) {
        let (ring_a, ring_b) = (pair[0], pair[1]);
        for k in 0..verts {
            let k_next = (k + 1) % verts;
            let v0 = ring_a + k as u32;
            let v1 = ring_a + k_next as u32;
            let v2 = ring_b + k as u32;
            let v3 = ring_b + k_next as u32;
            mesh.push_triangle(v0, v1, v2);
            mesh.push_triangle(v1, v3, v2);
        }
    }
}

/// Flat triangle fan closing the ribbon at `frame`, facing along the
/// tangent when `forward`, against it otherwise.
fn emit_cap(
    mesh: &mut Mesh,
    frame: &Frame,
    profile: &CrossSectionProfile,
    color: [f32; 3],
    params: &TessellationParams,
    forward: bool,
) {
    let cap_normal = if forward {
        frame.tangent
    } else {
        -frame.tangent
    };
    let center = mesh.push_vertex(frame.pos, cap_normal, color);
    let edge_base = mesh.vertex_count() as u32;
    let edge = ring(frame, profile, params);
    let verts = edge.len();
    for (offset, _) in edge {
        let _ = mesh.push_vertex(frame.pos + offset, cap_normal, color);
    }

    for k in 0..verts {
        let k_next = (k + 1) % verts;
        let (a, b) = (edge_base + k as u32, edge_base + k_next as u32);
        if forward {
            mesh.push_triangle(center, a, b);
        } else {
            mesh.push_triangle(center, b, a);
        }
    }
}

// ==================== ARROW HEAD ====================

/// Closed wedge from the arrow base frame toward `tip_pos`.
///
/// The tip lies on the base tangent at the tip frame's reach, capped at
/// `arrow_length`, so the wedge never overruns the tip sample.
fn arrow_wedge(
    frame: &Frame,
    profile: &CrossSectionProfile,
    tip_pos: Vec3,
    color: [f32; 3],
    params: &TessellationParams,
) -> Mesh {
    let mut wedge = Mesh::with_capacity(22, 30);
    let (t, n, b) = (frame.tangent, frame.normal, frame.binormal);
    let up = b * profile.half_thickness;
    let hw = profile.half_width;
    let wing = hw + params.wing_extension;

    let reach = (tip_pos - frame.pos).dot(t);
    let length = if reach > f32::EPSILON {
        reach.min(params.arrow_length)
    } else {
        params.arrow_length
    };

    let edge_l = frame.pos + n * hw;
    let edge_r = frame.pos - n * hw;
    let wing_l = frame.pos + n * wing;
    let wing_r = frame.pos - n * wing;
    let tip = frame.pos + t * length;
    let centroid = (wing_l + wing_r + tip) / 3.0;

    // Top and bottom
    push_face(&mut wedge, &[wing_l + up, wing_r + up, tip + up], b, color);
    push_face(&mut wedge, &[wing_l - up, wing_r - up, tip - up], -b, color);

    // Thickness along the slanted edges
    for w in [wing_l, wing_r] {
        let outward = (w + tip) * 0.5 - centroid;
        let side = [w - up, w + up, tip + up, tip - up];
        push_face(&mut wedge, &side, outward, color);
    }

    // Back of the wings, between ribbon edge and wing tip
    if params.wing_extension > f32::EPSILON {
        for (e, w) in [(edge_l, wing_l), (edge_r, wing_r)] {
            push_face(&mut wedge, &[e - up, e + up, w + up, w - up], -t, color);
        }
    }

    wedge
}

/// Flat-shaded convex polygon wound to face `outward`.
fn push_face(mesh: &mut Mesh, corners: &[Vec3], outward: Vec3, color: [f32; 3]) {
    let mut face_normal = (corners[1] - corners[0]).cross(corners[2] - corners[0]);
    let flip = face_normal.dot(outward) < 0.0;
    if flip {
        face_normal = -face_normal;
    }
    let normal = face_normal
        .try_normalize()
        .or_else(|| outward.try_normalize())
        .unwrap_or(Vec3::Z);

    let base = mesh.vertex_count() as u32;
    for &corner in corners {
        let _ = mesh.push_vertex(corner, normal, color);
    }
    for i in 1..corners.len() as u32 - 1 {
        if flip {
            mesh.push_triangle(base, base + i + 1, base + i);
        } else {
            mesh.push_triangle(base, base + i, base + i + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::frame::generate_frames;
    use crate::geometry::profile::generate_profiles;
    use crate::secondary_structure::SSType;

    fn line_frames(count: usize, spacing: f32) -> Vec<Frame> {
        let pts: Vec<Vec3> = (0..count)
            .map(|i| Vec3::new(0.0, 0.0, i as f32 * spacing))
            .collect();
        generate_frames(&pts)
    }

    fn uniform(count: usize, ss: SSType) -> Vec<CrossSectionProfile> {
        vec![CrossSectionProfile::for_ss(ss, &GeometryOptions::default()); count]
    }

    /// Geometric triangle normal must agree with the stored vertex normals.
    fn assert_outward_winding(mesh: &Mesh, triangles: std::ops::Range<usize>) {
        for tri in triangles {
            let [a, b, c] = [0, 1, 2].map(|j| mesh.indices[tri * 3 + j] as usize);
            let face = (mesh.positions[b] - mesh.positions[a])
                .cross(mesh.positions[c] - mesh.positions[a]);
            let avg = mesh.normals[a] + mesh.normals[b] + mesh.normals[c];
            assert!(face.dot(avg) > 0.0, "triangle {tri} wound inward");
        }
    }

    #[test]
    fn fewer_than_two_frames_is_empty() {
        let frames = line_frames(1, 1.0);
        let params = TessellationParams::default();
        let mesh = tessellate(&frames, &uniform(1, SSType::Coil), &[], &params);
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn tube_counts_and_winding() {
        let params = TessellationParams {
            mode: CrossSectionMode::Circle,
            ring_verts: 8,
            ..TessellationParams::default()
        };
        let frames = line_frames(5, 1.0);
        let red = [[1.0, 0.0, 0.0]];
        let mesh = tessellate(&frames, &uniform(5, SSType::Coil), &red, &params);

        // 5 rings + two caps of (center + ring)
        assert_eq!(mesh.vertex_count(), 5 * 8 + 2 * 9);
        assert_eq!(mesh.triangle_count(), 4 * 8 * 2 + 2 * 8);
        assert!(mesh.is_valid());
        assert_outward_winding(&mesh, 0..mesh.triangle_count());
        assert!(mesh.colors.iter().all(|c| *c == [1.0, 0.0, 0.0]));

        for i in 0..5 * 8 {
            let radial = mesh.positions[i] - frames[i / 8].pos;
            assert!((radial.length() - 0.3).abs() < 1e-5);
            assert!(mesh.normals[i].dot(radial.normalize()) > 0.999);
        }
    }

    #[test]
    fn ring_verts_are_clamped() {
        let params = TessellationParams {
            mode: CrossSectionMode::Ellipse,
            ring_verts: 1,
            end_caps: false,
            ..TessellationParams::default()
        };
        let frames = line_frames(2, 1.0);
        let mesh = tessellate(&frames, &uniform(2, SSType::Helix), &[], &params);
        assert_eq!(mesh.vertex_count(), 6);
        assert!(mesh.colors.iter().all(|c| *c == FALLBACK_COLOR));
    }

    #[test]
    fn ellipse_normals_follow_gradient() {
        let params = TessellationParams {
            ring_verts: 16,
            end_caps: false,
            ..TessellationParams::default()
        };
        let frames = line_frames(3, 1.0);
        let mesh = tessellate(&frames, &uniform(3, SSType::Helix), &[], &params);
        assert_outward_winding(&mesh, 0..mesh.triangle_count());
        for (p, nrm) in mesh.positions.iter().zip(&mesh.normals).take(16) {
            let radial = (*p - frames[0].pos).normalize();
            assert!((nrm.length() - 1.0).abs() < 1e-5);
            assert!(nrm.dot(radial) > 0.0);
        }
        // At 45 degrees a flat ellipse's normal tilts off the radial.
        let radial = (mesh.positions[2] - frames[0].pos).normalize();
        assert!(mesh.normals[2].dot(radial) < 0.999);
    }

    #[test]
    fn rectangle_mode_uses_four_corners() {
        let params = TessellationParams {
            mode: CrossSectionMode::Rectangle,
            end_caps: false,
            ..TessellationParams::default()
        };
        let frames = line_frames(4, 1.0);
        let mesh = tessellate(&frames, &uniform(4, SSType::Sheet), &[], &params);
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.triangle_count(), 3 * 4 * 2);
        assert_outward_winding(&mesh, 0..mesh.triangle_count());
    }

    #[test]
    fn caps_can_be_disabled() {
        let params = TessellationParams {
            end_caps: false,
            ..TessellationParams::default()
        };
        let frames = line_frames(4, 1.0);
        let mesh = tessellate(&frames, &uniform(4, SSType::Coil), &[], &params);
        assert_eq!(mesh.vertex_count(), 4 * 12);
    }

    #[test]
    fn sheet_arrow_wedge_extends_past_body() {
        let geo = GeometryOptions::default();
        let params = TessellationParams::from_options(&geo);
        let frames = line_frames(10, 0.6);
        let profiles = generate_profiles(&[SSType::Sheet; 10], &geo);
        let mesh = tessellate(&frames, &profiles, &[], &params);
        assert!(mesh.is_valid());

        // Body: frames 0..=7 up to the flare peak, start cap only.
        // Wedge: 22 vertices, 10 triangles.
        let body_verts = 8 * 12 + 13;
        let body_tris = 7 * 12 * 2 + 12;
        assert_eq!(mesh.vertex_count(), body_verts + 22);
        assert_eq!(mesh.triangle_count(), body_tris + 10);

        let base = frames[7];
        let furthest = mesh.positions[body_verts..]
            .iter()
            .map(|p| (*p - base.pos).dot(base.tangent))
            .fold(f32::MIN, f32::max);
        assert!(furthest > 0.0);
        // Tip frame is 1.2 ahead, inside arrow_length.
        assert!((furthest - 1.2).abs() < 1e-5);
        let reach = profiles[7].half_thickness + 1e-4;
        assert!(mesh.positions[body_verts..]
            .iter()
            .any(|p| p.distance(frames[9].pos) <= reach));

        let body_max = mesh.positions[..body_verts]
            .iter()
            .map(|p| p.z)
            .fold(f32::MIN, f32::max);
        assert!(body_max <= base.pos.z + 1e-5);

        assert_outward_winding(&mesh, body_tris..mesh.triangle_count());
    }

    #[test]
    fn arrow_outline_narrows_after_flare_peak() {
        let geo = GeometryOptions::default();
        let params = TessellationParams::from_options(&geo);
        let frames = line_frames(10, 0.6);
        let profiles = generate_profiles(&[SSType::Sheet; 10], &geo);
        let mesh = tessellate(&frames, &profiles, &[], &params);

        let peak = profiles
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.half_width.total_cmp(&b.1.half_width))
            .map_or(0, |(i, _)| i);
        let peak_z = frames[peak].pos.z;
        let normal = frames[peak].normal;

        // Widest lateral extent per axial level, from the peak forward.
        let mut points: Vec<(f32, f32)> = mesh
            .positions
            .iter()
            .filter(|p| p.z >= peak_z - 1e-5)
            .map(|p| (p.z, p.dot(normal).abs()))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut levels: Vec<(f32, f32)> = Vec::new();
        for (z, lateral) in points {
            match levels.last_mut() {
                Some(level) if z - level.0 < 1e-4 => level.1 = level.1.max(lateral),
                _ => levels.push((z, lateral)),
            }
        }

        assert!(levels.len() >= 2);
        assert!(levels.last().is_some_and(|l| l.1 < 1e-4));
        for pair in levels.windows(2) {
            assert!(pair[1].1 <= pair[0].1 + 1e-5, "outline widens: {levels:?}");
        }
    }

    #[test]
    fn arrow_length_caps_the_wedge() {
        let geo = GeometryOptions::default();
        let params = TessellationParams {
            arrow_length: 0.5,
            ..TessellationParams::from_options(&geo)
        };
        let frames = line_frames(10, 0.6);
        let profiles = generate_profiles(&[SSType::Sheet; 10], &geo);
        let mesh = tessellate(&frames, &profiles, &[], &params);
        let furthest = mesh.positions.iter().map(|p| p.z).fold(f32::MIN, f32::max);
        assert!((furthest - (frames[7].pos.z + 0.5)).abs() < 1e-5);
    }

    #[test]
    fn body_resumes_after_arrow_tip() {
        let geo = GeometryOptions::default();
        let mut ss = vec![SSType::Sheet; 6];
        ss.extend([SSType::Coil; 4]);
        let profiles = generate_profiles(&ss, &geo);
        let pieces = split_pieces(&profiles);
        assert_eq!(pieces.len(), 2);
        let spans: Vec<_> = pieces.iter().map(|p| (p.start, p.end, p.arrow_tip)).collect();
        assert_eq!(spans, vec![(0, 3, Some(5)), (6, 9, None)]);

        let frames = line_frames(10, 0.6);
        let params = TessellationParams::from_options(&geo);
        let mesh = tessellate(&frames, &profiles, &[], &params);
        assert!(mesh.is_valid());
    }

    #[test]
    fn missing_colors_reuse_the_last() {
        let params = TessellationParams {
            end_caps: false,
            ..TessellationParams::default()
        };
        let colors = [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let frames = line_frames(3, 1.0);
        let mesh = tessellate(&frames, &uniform(3, SSType::Coil), &colors, &params);
        assert_eq!(mesh.colors[0], [1.0, 0.0, 0.0]);
        assert_eq!(mesh.colors[2 * 12], [0.0, 0.0, 1.0]);
    }
}
