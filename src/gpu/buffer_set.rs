//! GPU buffer ownership for one morphing point cloud
//!
//! Owns the sampled-position buffer plus the vertex/triangle mirrors of
//! whichever mesh is currently bound. Mirror slots are reused sequentially:
//! a transition restart releases the old mirrors and uploads the target
//! mesh into the same slots while the position buffer stays put. Release is
//! idempotent so the deactivate/reactivate and mid-transition reallocation
//! paths can never double-free or leak.

use wgpu::util::DeviceExt;

use crate::constants::sampling::POSITION_STRIDE;
use crate::error::{MorphError, MorphResult};
use crate::mesh::MeshAsset;

/// Byte size of the sampled-position buffer for a given resolution:
/// `resolution²` elements of 3 packed floats.
pub fn position_buffer_size(resolution: u32) -> u64 {
    (resolution as u64 * resolution as u64) * POSITION_STRIDE
}

/// Owned GPU buffers for one mesh plus the shared position output.
pub struct MeshBufferSet {
    positions: Option<wgpu::Buffer>,
    vertices: Option<wgpu::Buffer>,
    triangles: Option<wgpu::Buffer>,
    /// Element capacity of the position buffer (resolution² while allocated).
    capacity: u32,
    vertex_count: u32,
    index_count: u32,
}

impl MeshBufferSet {
    pub fn new() -> Self {
        Self {
            positions: None,
            vertices: None,
            triangles: None,
            capacity: 0,
            vertex_count: 0,
            index_count: 0,
        }
    }

    /// Create the fixed-capacity sampled-position buffer. Any previous
    /// position buffer is released first; the buffer is recreated, never
    /// resized, when the resolution changes.
    pub fn allocate_positions(
        &mut self,
        device: &wgpu::Device,
        resolution: u32,
    ) -> MorphResult<()> {
        let size = position_buffer_size(resolution);
        let limit = device.limits().max_buffer_size;
        if size > limit {
            return Err(MorphError::BufferTooLarge {
                label: "sampled positions",
                size,
                limit,
            });
        }

        if let Some(buffer) = self.positions.take() {
            buffer.destroy();
        }

        self.positions = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sampled Position Buffer"),
            size,
            usage: wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        }));
        self.capacity = resolution * resolution;

        log::debug!(
            "[MeshBufferSet] Allocated position buffer: {} elements, {} bytes",
            self.capacity,
            size
        );
        Ok(())
    }

    /// Upload a mesh's vertex and triangle arrays into the mirror slots,
    /// replacing whatever mesh was bound before. The position buffer is
    /// untouched, and a rejected upload leaves the previous mesh bound.
    pub fn upload_mesh(&mut self, device: &wgpu::Device, mesh: &MeshAsset) -> MorphResult<()> {
        let vertex_bytes = mesh.vertices.len() as u64 * POSITION_STRIDE;
        let index_bytes = mesh.indices.len() as u64 * std::mem::size_of::<u32>() as u64;
        let limit = device.limits().max_buffer_size;
        if vertex_bytes.max(index_bytes) > limit {
            // The rejected mesh contributed nothing yet; the previously
            // bound mirrors stay live so the point cloud keeps rendering.
            return Err(MorphError::BufferTooLarge {
                label: "mesh mirror",
                size: vertex_bytes.max(index_bytes),
                limit,
            });
        }

        self.release_mirrors();

        let packed: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.to_array()).collect();
        self.vertices = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Mirror"),
            contents: bytemuck::cast_slice(&packed),
            usage: wgpu::BufferUsages::STORAGE,
        }));
        self.triangles = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Triangle Mirror"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::STORAGE,
        }));
        self.vertex_count = mesh.vertex_count();
        self.index_count = mesh.index_count();

        log::debug!(
            "[MeshBufferSet] Bound mesh '{}': {} vertices, {} indices",
            mesh.name,
            self.vertex_count,
            self.index_count
        );
        Ok(())
    }

    /// Release only the mesh mirrors (transition restart path). Idempotent.
    pub fn release_mirrors(&mut self) {
        if let Some(buffer) = self.vertices.take() {
            buffer.destroy();
        }
        if let Some(buffer) = self.triangles.take() {
            buffer.destroy();
        }
        self.vertex_count = 0;
        self.index_count = 0;
    }

    /// Release everything this set owns. Idempotent; safe to call when
    /// nothing is allocated.
    pub fn release(&mut self) {
        self.release_mirrors();
        if let Some(buffer) = self.positions.take() {
            buffer.destroy();
        }
        self.capacity = 0;
    }

    pub fn positions(&self) -> MorphResult<&wgpu::Buffer> {
        self.positions
            .as_ref()
            .ok_or(MorphError::PositionsNotAllocated)
    }

    pub fn vertex_buffer(&self) -> MorphResult<&wgpu::Buffer> {
        self.vertices.as_ref().ok_or(MorphError::MirrorsNotBound)
    }

    pub fn triangle_buffer(&self) -> MorphResult<&wgpu::Buffer> {
        self.triangles.as_ref().ok_or(MorphError::MirrorsNotBound)
    }

    pub fn has_positions(&self) -> bool {
        self.positions.is_some()
    }

    pub fn has_mirrors(&self) -> bool {
        self.vertices.is_some() && self.triangles.is_some()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

impl Default for MeshBufferSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_buffer_sizing() {
        assert_eq!(position_buffer_size(10), 100 * 12);
        assert_eq!(position_buffer_size(1000), 1_000_000 * 12);
    }

    #[test]
    fn rejected_upload_keeps_previous_mesh_bound() {
        use crate::gpu::context::GpuContext;
        use glam::Vec3;

        let limits = wgpu::Limits {
            max_buffer_size: 2048,
            ..wgpu::Limits::downlevel_defaults()
        };
        let Some(context) = GpuContext::new_headless_with_limits(limits) else {
            return;
        };

        let mut set = MeshBufferSet::new();
        let cube = MeshAsset::unit_cube("small");
        set.upload_mesh(&context.device, &cube).unwrap();
        assert!(set.has_mirrors());

        // 300 vertices at 12 bytes each overruns the 2048-byte limit.
        let oversized = MeshAsset {
            name: "oversized".to_string(),
            vertices: vec![Vec3::ONE; 300],
            indices: vec![0, 1, 2],
            bounds_size: Vec3::ONE,
        };
        let result = set.upload_mesh(&context.device, &oversized);
        assert!(matches!(result, Err(MorphError::BufferTooLarge { .. })));

        // The cube's mirrors survive the failed swap attempt.
        assert!(set.has_mirrors());
        assert_eq!(set.vertex_count(), 8);
        assert_eq!(set.index_count(), 36);
    }

    #[test]
    fn release_is_idempotent_when_empty() {
        let mut set = MeshBufferSet::new();
        set.release();
        set.release();
        assert!(!set.has_positions());
        assert!(!set.has_mirrors());
        assert_eq!(set.capacity(), 0);
    }
}
