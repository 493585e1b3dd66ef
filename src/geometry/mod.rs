//! Backbone ribbon geometry.
//!
//! The per-chain pipeline runs anchors through [`spline::fit_curve`],
//! [`frame::build_frames`], [`profile::generate_profiles`] and finally
//! [`tessellate::tessellate`]. Each stage is a pure function over its
//! inputs; [`crate::ribbon`] wires them together for a whole structure.

pub mod frame;
pub mod mesh;
pub mod profile;
pub mod spline;
pub mod tessellate;

pub use frame::Frame;
pub use mesh::{Mesh, MeshVertex, PreparedMesh};
pub use profile::CrossSectionProfile;
pub use spline::{CurveSample, SplineParams};
pub use tessellate::TessellationParams;
