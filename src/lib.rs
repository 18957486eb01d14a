//! Morph Engine - a continuously morphing point-cloud sculpture
//!
//! Samples points across the surface of a source mesh with a compute
//! kernel, renders them as instanced geometry, and perpetually transitions
//! the cloud toward newly chosen target meshes on an eased timer:
//! {2.0 s transition, 1.5 s hold, commit, 0.5 s pause, next}.
//!
//! The host owns the window, surface, and camera; this crate owns the
//! buffers, the dispatch planning, the transition state machine, and the
//! per-frame draw.

pub mod constants;
pub mod error;
pub mod gpu;
pub mod mesh;
pub mod renderer;
pub mod transition;

pub use error::{MorphError, MorphResult};
pub use gpu::{
    normalize_scale, plan_sampling, plan_transform, position_buffer_size, DispatchParams,
    GpuContext, KernelParams, MeshBufferSet, MorphKernel,
};
pub use mesh::MeshAsset;
pub use renderer::PointCloudRenderer;
pub use transition::{
    EasingKind, MorphController, PhaseAction, TransitionPhase, TransitionState,
};

// Re-export wgpu so hosts can hand us their device without version skew
pub use wgpu;

use crate::constants::sampling::{MAX_RESOLUTION, MIN_RESOLUTION};

/// Engine configuration, supplied by the host at activation time.
#[derive(Debug, Clone)]
pub struct MorphConfig {
    /// Sampling resolution; the position buffer holds resolution² points.
    pub resolution: u32,
    /// The sculpture's mesh collection. Needs at least 2 valid meshes or
    /// rejection sampling has nothing to pick between.
    pub meshes: Vec<MeshAsset>,
}

impl MorphConfig {
    /// Validate configuration parameters. Everything here is a caller
    /// contract: violations are rejected before any GPU resource exists,
    /// never discovered mid-transition.
    pub fn validate(&self) -> MorphResult<()> {
        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(MorphError::ResolutionOutOfRange {
                value: self.resolution,
            });
        }

        if self.meshes.len() < 2 {
            return Err(MorphError::NotEnoughMeshes {
                count: self.meshes.len(),
            });
        }

        for mesh in &self.meshes {
            mesh.validate()?;
        }

        log::info!(
            "[MorphConfig] Validated: resolution={}, {} meshes",
            self.resolution,
            self.meshes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cubes() -> Vec<MeshAsset> {
        vec![MeshAsset::unit_cube("a"), MeshAsset::unit_cube("b")]
    }

    #[test]
    fn valid_config_passes() {
        let config = MorphConfig {
            resolution: 100,
            meshes: two_cubes(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn resolution_bounds_are_enforced() {
        for resolution in [0, 9, 1001] {
            let config = MorphConfig {
                resolution,
                meshes: two_cubes(),
            };
            assert!(matches!(
                config.validate(),
                Err(MorphError::ResolutionOutOfRange { .. })
            ));
        }
        for resolution in [10, 1000] {
            let config = MorphConfig {
                resolution,
                meshes: two_cubes(),
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn single_mesh_collection_is_rejected_up_front() {
        // One mesh would make rejection sampling loop forever; it must be
        // a configuration error instead.
        let config = MorphConfig {
            resolution: 100,
            meshes: vec![MeshAsset::unit_cube("only")],
        };
        assert!(matches!(
            config.validate(),
            Err(MorphError::NotEnoughMeshes { count: 1 })
        ));
    }

    #[test]
    fn invalid_member_mesh_fails_validation() {
        let mut meshes = two_cubes();
        meshes[1].indices.clear();
        let config = MorphConfig {
            resolution: 100,
            meshes,
        };
        assert!(matches!(
            config.validate(),
            Err(MorphError::EmptyMesh { .. })
        ));
    }
}
