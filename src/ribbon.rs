//! Whole-structure ribbon generation.
//!
//! Splits a snapshot into chains, runs the spline → frame → profile →
//! tessellation pipeline for each chain in parallel, and merges the chain
//! meshes in chain order.

use glam::Vec3;
use rayon::prelude::*;

use crate::geometry::frame::{build_frames, Frame};
use crate::geometry::mesh::Mesh;
use crate::geometry::profile::{generate_profiles, CrossSectionProfile};
use crate::geometry::spline::{fit_curve, CurveSample, SplineParams};
use crate::geometry::tessellate::{tessellate, TessellationParams};
use crate::options::{ColorScheme, Options};
use crate::secondary_structure::{classify, per_residue_types, SSType, StructureSegment};
use crate::structure::{Anchor, StructureSnapshot};

/// Per-chain index range and bounding sphere for frustum culling.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRange {
    /// Chain identifier.
    pub chain_id: String,
    /// First index of the chain in [`RibbonOutput::mesh`]'s index buffer.
    pub index_start: u32,
    /// One past the chain's last index.
    pub index_end: u32,
    /// Centroid of the chain's anchors.
    pub bounding_center: Vec3,
    /// Distance from the centroid to the furthest anchor.
    pub bounding_radius: f32,
}

/// Everything produced for one chain.
#[derive(Debug, Clone, Default)]
pub struct ChainGeometry {
    /// Chain identifier.
    pub chain_id: String,
    /// Fitted curve.
    pub samples: Vec<CurveSample>,
    /// Frame per sample.
    pub frames: Vec<Frame>,
    /// Profile per sample.
    pub profiles: Vec<CrossSectionProfile>,
    /// Tessellated chain mesh, indices local to this mesh.
    pub mesh: Mesh,
}

/// Merged ribbon for a whole structure.
#[derive(Debug, Clone, Default)]
pub struct RibbonOutput {
    /// All chains in one mesh.
    pub mesh: Mesh,
    /// Index range per emitted chain, in mesh order.
    pub chains: Vec<ChainRange>,
    /// Classified structure segments over the snapshot's residues.
    pub segments: Vec<StructureSegment>,
}

/// Build the ribbon mesh for every chain in `snapshot`.
///
/// Chains with fewer than two anchors are skipped.
#[must_use]
pub fn build_ribbon(
    snapshot: &StructureSnapshot,
    options: &Options,
    colors: &ColorScheme,
) -> RibbonOutput {
    let residues = snapshot.residues();
    let segments = classify(
        &residues,
        &snapshot.helices,
        &snapshot.sheets,
        options.classifier.overlap_policy,
    );
    let residue_ss = per_residue_types(&segments, residues.len());
    let chains = split_chains(snapshot.anchors(&residues));

    let built: Vec<ChainGeometry> = chains
        .par_iter()
        .filter(|anchors| anchors.len() >= 2)
        .map(|anchors| build_chain(anchors, &residue_ss, options, colors))
        .collect();

    let mut ranges = Vec::with_capacity(built.len());
    let mut index_start = 0u32;
    for (chain, anchors) in built.iter().zip(chains.iter().filter(|a| a.len() >= 2)) {
        let index_end = index_start + chain.mesh.indices.len() as u32;
        let positions: Vec<Vec3> = anchors.iter().map(|a| a.position).collect();
        let (bounding_center, bounding_radius) = bounding_sphere(&positions);
        ranges.push(ChainRange {
            chain_id: chain.chain_id.clone(),
            index_start,
            index_end,
            bounding_center,
            bounding_radius,
        });
        index_start = index_end;
    }
    let mesh = Mesh::merge(built.into_iter().map(|chain| chain.mesh));

    log::debug!(
        "ribbon: {} chains, {} vertices, {} triangles",
        ranges.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    RibbonOutput {
        mesh,
        chains: ranges,
        segments,
    }
}

/// Run the geometry pipeline for one chain's anchors.
///
/// `residue_ss` is indexed by [`Anchor::residue_idx`]; residues past its end
/// are coil.
#[must_use]
pub fn build_chain(
    anchors: &[Anchor],
    residue_ss: &[SSType],
    options: &Options,
    colors: &ColorScheme,
) -> ChainGeometry {
    let geo = &options.geometry;
    let chain_id = anchors
        .first()
        .map(|a| a.chain_id.clone())
        .unwrap_or_default();
    let ss_of = |anchor: &Anchor| {
        residue_ss
            .get(anchor.residue_idx)
            .copied()
            .unwrap_or_default()
    };

    let positions: Vec<Vec3> = anchors.iter().map(|a| a.position).collect();
    let samples = fit_curve(&positions, &SplineParams::from_options(geo));
    let sample_positions: Vec<Vec3> = samples.iter().map(|s| s.pos).collect();
    let frames = build_frames(&sample_positions, geo.frame_smoothing_window);

    let sample_ss: Vec<SSType> = samples
        .iter()
        .map(|s| anchors.get(s.residue).map_or(SSType::Coil, ss_of))
        .collect();
    let profiles = generate_profiles(&sample_ss, geo);

    let anchor_colors: Vec<[f32; 3]> = anchors
        .iter()
        .map(|a| {
            colors.residue_color(a.residue_idx, ss_of(a), &options.colors)
        })
        .collect();
    let sample_colors: Vec<[f32; 3]> = samples
        .iter()
        .map(|s| interpolate_color(&anchor_colors, s.t))
        .collect();

    let mesh = tessellate(
        &frames,
        &profiles,
        &sample_colors,
        &TessellationParams::from_options(geo),
    );

    log::debug!(
        "chain {chain_id}: {} anchors, {} samples, {} triangles",
        anchors.len(),
        samples.len(),
        mesh.triangle_count()
    );

    ChainGeometry {
        chain_id,
        samples,
        frames,
        profiles,
        mesh,
    }
}

/// Group anchors into runs sharing a chain id.
fn split_chains(anchors: Vec<Anchor>) -> Vec<Vec<Anchor>> {
    let mut chains: Vec<Vec<Anchor>> = Vec::new();
    for anchor in anchors {
        match chains.last_mut() {
            Some(chain) if chain[0].chain_id == anchor.chain_id => chain.push(anchor),
            _ => chains.push(vec![anchor]),
        }
    }
    chains
}

/// Color at curve parameter `t`, blended between the two nearest anchors.
fn interpolate_color(anchor_colors: &[[f32; 3]], t: f32) -> [f32; 3] {
    let n = anchor_colors.len();
    if n < 2 {
        return anchor_colors.first().copied().unwrap_or_default();
    }
    let u = t.clamp(0.0, 1.0) * (n - 1) as f32;
    let i0 = (u.floor() as usize).min(n - 1);
    let i1 = (i0 + 1).min(n - 1);
    let f = u - i0 as f32;
    let (a, b) = (anchor_colors[i0], anchor_colors[i1]);
    [
        a[0] + (b[0] - a[0]) * f,
        a[1] + (b[1] - a[1]) * f,
        a[2] + (b[2] - a[2]) * f,
    ]
}

/// Centroid and max distance from it.
fn bounding_sphere(positions: &[Vec3]) -> (Vec3, f32) {
    if positions.is_empty() {
        return (Vec3::ZERO, 0.0);
    }
    let center = positions.iter().copied().sum::<Vec3>() / positions.len() as f32;
    let radius = positions
        .iter()
        .map(|p| (*p - center).length())
        .fold(0.0f32, f32::max);
    (center, radius)
}
