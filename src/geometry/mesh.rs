//! Triangle mesh arena and interleaved vertex packing.

use glam::Vec3;

use crate::error::RibbonError;

/// Neutral grey used when no color is supplied.
pub const FALLBACK_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// Structure-agnostic triangle mesh with parallel attribute arrays.
///
/// Meshes own their vertices and indices outright; combining two meshes
/// copies the other's data and rebases its indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Unit vertex normals, parallel to `positions`.
    pub normals: Vec<Vec3>,
    /// Linear RGB vertex colors, parallel to `positions`.
    pub colors: Vec<[f32; 3]>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh with room for `vertices` vertices and `indices` indices.
    #[must_use]
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of complete triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Push one vertex, returning its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, color: [f32; 3]) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.colors.push(color);
        idx
    }

    /// Push one triangle.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Concatenate `other` onto this mesh, rebasing its indices by the
    /// current vertex count.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.colors.extend_from_slice(&other.colors);
        self.indices.extend(other.indices.iter().map(|&i| i + base));
    }

    /// Merge meshes in iteration order into one.
    #[must_use]
    pub fn merge<I>(meshes: I) -> Self
    where
        I: IntoIterator<Item = Mesh>,
    {
        meshes.into_iter().fold(Self::new(), |mut acc, mesh| {
            if acc.positions.is_empty() {
                mesh
            } else {
                acc.append(&mesh);
                acc
            }
        })
    }

    /// Check attribute lengths and index bounds.
    ///
    /// # Errors
    ///
    /// [`RibbonError::AttributeMismatch`] when the attribute arrays differ
    /// in length, [`RibbonError::InvalidMesh`] for the first out-of-range
    /// index.
    pub fn validate(&self) -> Result<(), RibbonError> {
        let positions = self.positions.len();
        if self.normals.len() != positions || self.colors.len() != positions {
            return Err(RibbonError::AttributeMismatch {
                positions,
                normals: self.normals.len(),
                colors: self.colors.len(),
            });
        }
        if let Some(&index) =
            self.indices.iter().find(|&&i| i as usize >= positions)
        {
            return Err(RibbonError::InvalidMesh {
                index,
                vertex_count: positions,
            });
        }
        Ok(())
    }

    /// Whether [`Mesh::validate`] passes and indices form whole triangles.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.indices.len() % 3 == 0 && self.validate().is_ok()
    }

    /// Pack into an interleaved vertex buffer plus index buffer.
    ///
    /// # Errors
    ///
    /// [`RibbonError::EmptyMesh`] when there is nothing to draw, otherwise
    /// whatever [`Mesh::validate`] reports.
    pub fn prepare(&self) -> Result<PreparedMesh, RibbonError> {
        if self.positions.is_empty() || self.indices.is_empty() {
            return Err(RibbonError::EmptyMesh);
        }
        self.validate()?;

        let vertices = self
            .positions
            .iter()
            .zip(&self.normals)
            .zip(&self.colors)
            .map(|((p, n), c)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
                color: *c,
            })
            .collect();

        Ok(PreparedMesh {
            vertices,
            indices: self.indices.clone(),
        })
    }
}

/// 36-byte interleaved vertex: position, normal, color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
}

/// Upload-ready vertex and index buffers.
#[derive(Debug, Clone, Default)]
pub struct PreparedMesh {
    /// Interleaved vertices.
    pub vertices: Vec<MeshVertex>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl PreparedMesh {
    /// Raw vertex bytes.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
