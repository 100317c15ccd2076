//! # Procedural Geometry Generation
//!
//! Rooms, frames, pedestals and placeholders are built from boxes and
//! planes, so none of them needs a model file.
//!
//! ```rust
//! use vernissage::gfx::geometry::{generate_box, generate_plane};
//!
//! let pedestal = generate_box(1.0, 0.8, 1.0);
//! let canvas = generate_plane(1.9, 1.4);
//! assert_eq!(pedestal.triangle_count(), 12);
//! assert_eq!(canvas.triangle_count(), 2);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::{mesh::MeshData, vertex::Vertex3D};

/// Texture corners of a quad, counter-clockwise from bottom left
const QUAD_UV: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

/// Indexed triangles under construction
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    pub vertices: Vec<Vertex3D>,
    /// Counter-clockwise winding
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a flat quad; `corners` run counter-clockwise seen from `normal`
    pub fn push_quad(&mut self, normal: [f32; 3], corners: [[f32; 3]; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(
            corners
                .into_iter()
                .zip(QUAD_UV)
                .map(|(position, uv)| Vertex3D::new(position, normal, uv)),
        );
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn into_mesh(self) -> MeshData {
        MeshData::new(self.vertices, self.indices)
    }
}
