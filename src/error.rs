//! Crate-level error types.

use std::fmt;

/// Errors produced by the viso-ribbon crate.
///
/// Geometry generation itself is fail-soft and never returns these; they
/// surface only from option I/O and from packing a mesh for upload.
#[derive(Debug)]
pub enum RibbonError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// The mesh has no vertices or no triangles to upload.
    EmptyMesh,
    /// A triangle index points past the end of the vertex arrays.
    InvalidMesh {
        /// The offending index value.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// Positions, normals and colors have different lengths.
    AttributeMismatch {
        /// Number of positions.
        positions: usize,
        /// Number of normals.
        normals: usize,
        /// Number of colors.
        colors: usize,
    },
}

impl fmt::Display for RibbonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::EmptyMesh => write!(f, "mesh is empty"),
            Self::InvalidMesh {
                index,
                vertex_count,
            } => write!(
                f,
                "mesh index {index} out of range for {vertex_count} vertices"
            ),
            Self::AttributeMismatch {
                positions,
                normals,
                colors,
            } => write!(
                f,
                "mesh attribute length mismatch: {positions} positions, \
                 {normals} normals, {colors} colors"
            ),
        }
    }
}

impl std::error::Error for RibbonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RibbonError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
