use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

/// Curve family used to interpolate backbone anchors.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SplineKind {
    /// Cardinal Catmull-Rom through every anchor.
    #[default]
    CatmullRom,
    /// Uniform cubic B-spline (approximating, meets both end anchors).
    BSpline,
    /// Cubic Hermite with finite-difference tangents.
    Hermite,
}

/// Shape of the ring extruded at every frame.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CrossSectionMode {
    /// Four-corner flat ribbon (legacy).
    Rectangle,
    /// Round tube.
    Circle,
    /// Smooth elliptical ribbon.
    #[default]
    Ellipse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
/// Spline, frame, profile and tessellation options for backbone ribbons.
pub struct GeometryOptions {
    /// Interpolating curve family.
    #[schemars(title = "Spline Kind")]
    pub spline_kind: SplineKind,
    /// Curve samples generated per residue span.
    #[schemars(title = "Segments Per Residue", range(min = 1, max = 32))]
    pub segments_per_residue: usize,
    /// Catmull-Rom tension (0.5 is the standard curve).
    #[schemars(title = "Spline Tension", range(min = 0.0, max = 1.0))]
    pub spline_tension: f32,
    /// Moving-average passes applied to the fitted curve.
    #[schemars(title = "Spline Smoothing", range(min = 0, max = 8))]
    pub spline_smoothing_iterations: usize,
    /// Gaussian window for normal smoothing (0 disables, otherwise >= 3).
    #[schemars(title = "Frame Smoothing Window", range(min = 0, max = 15))]
    pub frame_smoothing_window: usize,
    /// Cross-section ring shape.
    #[schemars(title = "Cross Section")]
    pub cross_section_mode: CrossSectionMode,
    /// Vertices around each round cross-section ring.
    #[schemars(title = "Cross Section Verts", range(min = 3, max = 32))]
    pub cross_section_verts: usize,
    /// Helix ribbon width in angstroms.
    #[schemars(title = "Helix Width", range(min = 0.1, max = 4.0))]
    pub helix_width: f32,
    /// Sheet ribbon width in angstroms.
    #[schemars(title = "Sheet Width", range(min = 0.1, max = 4.0))]
    pub sheet_width: f32,
    /// Sheet ribbon thickness in angstroms.
    #[schemars(title = "Sheet Thickness", range(min = 0.05, max = 1.0))]
    pub sheet_thickness: f32,
    /// Coil tube radius in angstroms.
    #[schemars(title = "Coil Radius", range(min = 0.05, max = 1.0))]
    pub coil_radius: f32,
    /// Whether sheet runs end in an arrow head.
    #[schemars(title = "Sheet Arrows")]
    pub sheet_arrows: bool,
    /// Wing half-width as a multiple of the sheet half-width.
    #[schemars(title = "Arrow Wing Scale", range(min = 1.0, max = 3.0))]
    pub arrow_wing_scale: f32,
    /// Longest distance from the arrow base to its tip in angstroms.
    #[schemars(title = "Arrow Length", range(min = 0.1, max = 5.0))]
    pub arrow_length: f32,
    /// How far the arrow wings reach past the ribbon edge.
    #[schemars(title = "Arrow Wing Extension", range(min = 0.0, max = 2.0))]
    pub arrow_wing_extension: f32,
    /// Samples blended across structure boundaries (0 disables).
    #[schemars(title = "Transition Samples", range(min = 0, max = 8))]
    pub transition_samples: usize,
    /// Easing applied to boundary transitions.
    #[schemars(title = "Transition Easing")]
    pub transition_easing: EasingFunction,
    /// Whether open ribbon ends are closed with caps.
    #[schemars(title = "End Caps")]
    pub end_caps: bool,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            spline_kind: SplineKind::CatmullRom,
            segments_per_residue: 6,
            spline_tension: 0.5,
            spline_smoothing_iterations: 1,
            frame_smoothing_window: 0,
            cross_section_mode: CrossSectionMode::Ellipse,
            cross_section_verts: 12,
            helix_width: 1.4,
            sheet_width: 1.6,
            sheet_thickness: 0.3,
            coil_radius: 0.3,
            sheet_arrows: true,
            arrow_wing_scale: 1.5,
            arrow_length: 1.6,
            arrow_wing_extension: 0.6,
            transition_samples: 0,
            transition_easing: EasingFunction::SmoothStep,
            end_caps: true,
        }
    }
}

impl GeometryOptions {
    /// Samples per span, never zero.
    #[must_use]
    pub fn samples_per_segment(&self) -> usize {
        self.segments_per_residue.max(1)
    }

    /// Ring resolution, never below a triangle.
    #[must_use]
    pub fn ring_verts(&self) -> usize {
        self.cross_section_verts.max(3)
    }
}
