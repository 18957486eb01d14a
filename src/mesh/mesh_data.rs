//! Mesh data structures - Pure DOP
//!
//! NO GPU resources here. Just the CPU-side mesh description the kernels
//! sample from. GPU mirrors live in `gpu::buffer_set`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{MorphError, MorphResult};

/// Immutable source mesh: vertex positions, triangle vertex-index triples,
/// and an axis-aligned bounding size used for scale normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshAsset {
    pub name: String,
    pub vertices: Vec<Vec3>,
    /// Triangle vertex indices; length is a multiple of 3.
    pub indices: Vec<u32>,
    /// Axis-aligned bounding box size of the mesh.
    pub bounds_size: Vec3,
}

impl MeshAsset {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Number of triangle indices (3 per triangle). The dispatch planners
    /// work in this unit, matching the kernel's triangle-buffer length.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count() / 3
    }

    /// Reject geometry the planners and the scale normalizer cannot handle.
    /// Called once per mesh at configuration time.
    pub fn validate(&self) -> MorphResult<()> {
        if self.vertices.is_empty() || self.indices.len() < 3 {
            return Err(MorphError::EmptyMesh {
                name: self.name.clone(),
                index_count: self.indices.len(),
            });
        }

        if self.indices.len() % 3 != 0 {
            return Err(MorphError::MalformedIndices {
                name: self.name.clone(),
                detail: format!("{} indices is not a multiple of 3", self.indices.len()),
            });
        }

        if let Some(&out_of_range) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.vertices.len())
        {
            return Err(MorphError::MalformedIndices {
                name: self.name.clone(),
                detail: format!(
                    "index {} out of range for {} vertices",
                    out_of_range,
                    self.vertices.len()
                ),
            });
        }

        let magnitude = self.bounds_size.length();
        if !magnitude.is_finite() || magnitude < f32::EPSILON {
            return Err(MorphError::DegenerateBounds {
                name: self.name.clone(),
                magnitude,
            });
        }

        Ok(())
    }

    /// Unit cube fixture: 8 vertices, 12 triangles. Used by tests and demos.
    pub fn unit_cube(name: &str) -> Self {
        let vertices = vec![
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ];
        let indices = vec![
            0, 1, 2, 0, 2, 3, // -Z
            5, 4, 7, 5, 7, 6, // +Z
            4, 0, 3, 4, 3, 7, // -X
            1, 5, 6, 1, 6, 2, // +X
            4, 5, 1, 4, 1, 0, // -Y
            3, 2, 6, 3, 6, 7, // +Y
        ];
        Self {
            name: name.to_string(),
            vertices,
            indices,
            bounds_size: Vec3::ONE,
        }
    }
}
