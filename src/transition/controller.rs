//! Morph controller - owns the GPU resources and drives the cycle
//!
//! Interprets the pure phase machine into buffer uploads and kernel
//! dispatches. Activation samples a random mesh once and immediately starts
//! the first transition; from then on `advance(delta_time)`, called once per
//! frame, keeps the transition → hold → commit → pause → transition cycle
//! running until deactivation.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::MorphResult;
use crate::gpu::buffer_set::MeshBufferSet;
use crate::gpu::context::GpuContext;
use crate::gpu::dispatch::{plan_sampling, plan_transform};
use crate::gpu::kernel::{KernelParams, MorphKernel};
use crate::gpu::scale::normalize_scale;
use crate::mesh::MeshAsset;
use crate::transition::render_step::{sampling_step, transition_step};
use crate::transition::transition_data::TransitionState;
use crate::transition::transition_operations as ops;
use crate::MorphConfig;

pub struct MorphController {
    device: Arc<wgpu::Device>,
    resolution: u32,
    meshes: Vec<MeshAsset>,
    state: TransitionState,
    buffers: MeshBufferSet,
    kernel: MorphKernel,
    /// Rebuilt after every mirror swap; dropped on deactivation so no
    /// stale binding can reference released buffers.
    bind_group: Option<wgpu::BindGroup>,
    /// Scale factor of the currently bound mesh.
    scale: f32,
    /// Set when a mid-cycle resource operation fails. A stalled controller
    /// stops advancing the phase machine and stops dispatching, so the
    /// last written point cloud stays on screen untouched.
    stalled: bool,
    rng: StdRng,
}

impl MorphController {
    /// Validates the configuration up front; a bad resolution or a
    /// collection that cannot sustain rejection sampling never reaches the
    /// state machine.
    pub fn new(context: &GpuContext, config: MorphConfig) -> MorphResult<Self> {
        config.validate()?;

        let kernel = MorphKernel::new(context.device.clone(), context.queue.clone());

        Ok(Self {
            device: context.device.clone(),
            resolution: config.resolution,
            meshes: config.meshes,
            state: TransitionState::new(),
            buffers: MeshBufferSet::new(),
            kernel,
            bind_group: None,
            scale: 1.0,
            stalled: false,
            rng: StdRng::from_entropy(),
        })
    }

    /// Allocate buffers, sample a randomly chosen mesh, and start the
    /// first transition. A failed activation releases whatever the attempt
    /// allocated and leaves the controller idle.
    pub fn activate(&mut self) -> MorphResult<()> {
        use rand::Rng;

        let initial = self.rng.gen_range(0..self.meshes.len());
        if let Err(err) = self.activate_from(initial) {
            self.bind_group = None;
            self.buffers.release();
            self.state = TransitionState::new();
            return Err(err);
        }
        Ok(())
    }

    fn activate_from(&mut self, initial: usize) -> MorphResult<()> {
        self.state.target_mesh = initial;
        self.sample_mesh(initial)?;

        // The first transition excludes the mesh just sampled; with no
        // committed source yet, that keeps the first morph from being a
        // no-op toward the same shape.
        ops::begin_transition(&mut self.state, &mut self.rng, self.meshes.len(), Some(initial));
        self.rebind_target()?;

        log::info!(
            "[MorphController] Activated: sampled mesh {} ({}), first target {}",
            initial,
            self.meshes[initial].name,
            self.state.target_mesh
        );
        Ok(())
    }

    /// Advance the cycle by one frame tick. No-op while idle or stalled.
    /// The first resource failure stalls the controller; the error is
    /// returned once and every later tick leaves the cloud frozen.
    pub fn advance(&mut self, delta_time: f32) -> MorphResult<()> {
        if self.stalled {
            return Ok(());
        }

        let result = match ops::advance(&mut self.state, delta_time, &mut self.rng, self.meshes.len())
        {
            ops::PhaseAction::None => Ok(()),
            ops::PhaseAction::TickTransform => self.tick_transform(),
            ops::PhaseAction::BeginTransition => {
                log::debug!(
                    "[MorphController] Next transition: mesh {} -> {}",
                    self.state
                        .current_mesh
                        .map(|i| i as i64)
                        .unwrap_or(-1),
                    self.state.target_mesh
                );
                self.rebind_target()
            }
        };

        if let Err(err) = &result {
            self.stalled = true;
            log::error!("[MorphController] Cycle stalled: {}", err);
        }
        result
    }

    /// Synchronously release every owned buffer and reset the machine to
    /// idle. Once idle, `advance` does nothing, so no pending tick can
    /// touch the released buffers.
    pub fn deactivate(&mut self) {
        self.bind_group = None;
        self.buffers.release();
        self.state = TransitionState::new();
        self.stalled = false;
        log::info!("[MorphController] Deactivated, all buffers released");
    }

    // ------------------------------------------------------------------
    // Dispatch paths
    // ------------------------------------------------------------------

    /// One-shot sampling pass for the initially displayed mesh.
    fn sample_mesh(&mut self, index: usize) -> MorphResult<()> {
        let mesh = &self.meshes[index];

        self.buffers.allocate_positions(&self.device, self.resolution)?;
        self.buffers.upload_mesh(&self.device, mesh)?;
        self.state.vertex_count = mesh.vertex_count() as f32;

        let plan = plan_sampling(mesh.index_count(), self.resolution);
        self.state.total_points = plan.total_points;
        self.scale = normalize_scale(mesh.bounds_size);

        let bind_group = self.kernel.bind(&self.buffers)?;
        self.kernel.dispatch_sample(
            &bind_group,
            KernelParams {
                resolution: self.resolution,
                triangles_count: mesh.index_count(),
                points_per_triangle: plan.points_per_triangle,
                positions_count: plan.total_points,
                scale: self.scale,
                transition_progress: 0.0,
                _padding: [0; 2],
            },
            plan,
        );
        self.bind_group = Some(bind_group);

        self.state.step = sampling_step(self.resolution, self.state.vertex_count);

        log::debug!(
            "[MorphController] Sampled '{}': {} points, step {:.5}",
            mesh.name,
            plan.total_points,
            self.state.step
        );
        Ok(())
    }

    /// Swap the mirror slots over to the phase machine's chosen target.
    /// The position buffer stays put; only the mirrors move.
    fn rebind_target(&mut self) -> MorphResult<()> {
        let mesh = &self.meshes[self.state.target_mesh];
        self.buffers.upload_mesh(&self.device, mesh)?;
        self.scale = normalize_scale(mesh.bounds_size);
        self.bind_group = Some(self.kernel.bind(&self.buffers)?);
        Ok(())
    }

    /// One transform tick: dispatch at the eased timer, then run the count
    /// and step blends.
    fn tick_transform(&mut self) -> MorphResult<()> {
        if !self.buffers.has_mirrors() {
            return Err(crate::MorphError::MirrorsNotBound);
        }

        let index_count = self.buffers.index_count();
        let plan = plan_transform(index_count, self.resolution);

        let bind_group = self
            .bind_group
            .as_ref()
            .ok_or(crate::MorphError::MirrorsNotBound)?;
        self.kernel.dispatch_transform(
            bind_group,
            KernelParams {
                resolution: self.resolution,
                triangles_count: index_count,
                points_per_triangle: plan.points_per_triangle,
                positions_count: self.state.total_points,
                scale: self.scale,
                transition_progress: self.state.transition_timer,
                _padding: [0; 2],
            },
            plan,
        );

        self.state.total_points = ops::blend_point_count(
            self.state.total_points,
            plan.total_points,
            self.state.transition_timer,
        );
        self.state.vertex_count = ops::blend_vertex_count(
            self.state.vertex_count,
            self.buffers.vertex_count(),
            self.state.transition_timer,
        );
        self.state.step = transition_step(self.resolution, self.state.vertex_count);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Frame-facing accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn total_points(&self) -> u32 {
        self.state.total_points
    }

    pub fn step(&self) -> f32 {
        self.state.step
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning
    }

    /// True after a resource failure froze the cycle.
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// The live sampled-position buffer for the frame's draw.
    pub fn position_buffer(&self) -> MorphResult<&wgpu::Buffer> {
        self.buffers.positions()
    }
}

// Tests below need a real adapter; each one skips when the host has none.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::MorphError;

    fn two_cube_config(resolution: u32) -> MorphConfig {
        MorphConfig {
            resolution,
            meshes: vec![MeshAsset::unit_cube("alpha"), MeshAsset::unit_cube("beta")],
        }
    }

    #[test]
    fn deactivation_releases_buffers_and_halts_the_cycle() {
        let Ok(context) = GpuContext::new_headless() else {
            return;
        };
        let mut controller = MorphController::new(&context, two_cube_config(16)).unwrap();

        controller.activate().unwrap();
        controller.advance(0.1).unwrap();
        assert!(controller.is_transitioning());
        assert!(controller.buffers.has_positions());
        assert!(controller.buffers.has_mirrors());

        controller.deactivate();
        assert!(!controller.buffers.has_positions());
        assert!(!controller.buffers.has_mirrors());
        assert!(controller.bind_group.is_none());
        assert!(!controller.is_transitioning());
        assert!(controller.position_buffer().is_err());

        // Ticking an idle controller changes nothing.
        let before = controller.state;
        controller.advance(0.1).unwrap();
        assert_eq!(controller.state, before);
        assert_eq!(controller.total_points(), 0);
    }

    #[test]
    fn failed_activation_leaves_nothing_allocated() {
        // Position buffer for resolution 10 needs 1200 bytes, over this
        // device's 1024-byte cap, so activation fails at allocation.
        let limits = wgpu::Limits {
            max_buffer_size: 1024,
            ..wgpu::Limits::downlevel_defaults()
        };
        let Some(context) = GpuContext::new_headless_with_limits(limits) else {
            return;
        };
        let mut controller = MorphController::new(&context, two_cube_config(10)).unwrap();

        let result = controller.activate();
        assert!(matches!(result, Err(MorphError::BufferTooLarge { .. })));
        assert!(!controller.buffers.has_positions());
        assert!(!controller.buffers.has_mirrors());
        assert!(controller.bind_group.is_none());
        assert!(!controller.is_transitioning());
        assert!(!controller.is_stalled());
    }

    #[test]
    fn stalled_controller_freezes_instead_of_dispatching() {
        let Ok(context) = GpuContext::new_headless() else {
            return;
        };
        let mut controller = MorphController::new(&context, two_cube_config(16)).unwrap();

        controller.activate().unwrap();
        controller.advance(0.1).unwrap();

        controller.stalled = true;
        let before = controller.state;
        for _ in 0..10 {
            controller.advance(0.25).unwrap();
        }
        // The phase machine did not move and the mirrors are still bound,
        // so the last written cloud keeps rendering.
        assert_eq!(controller.state, before);
        assert!(controller.is_transitioning());
        assert!(controller.buffers.has_mirrors());

        // Deactivation clears the stall along with everything else.
        controller.deactivate();
        assert!(!controller.is_stalled());
    }
}
