//! Point-morph compute kernel wrapper
//!
//! Owns the two compute pipelines (`sample` and `transform` entry points of
//! the embedded WGSL module), the shared bind group layout, and the params
//! uniform. The kernel math itself is an opaque collaborator; this module
//! only guarantees the binding slots and dispatch grid contract.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::{BindGroup, BindGroupLayout, ComputePipeline, Device, Queue};

use crate::error::MorphResult;
use crate::gpu::buffer_set::MeshBufferSet;
use crate::gpu::dispatch::DispatchParams;

/// Parameter block shared by both kernel entry points, uploaded as one
/// uniform before each dispatch.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct KernelParams {
    /// Sampling resolution; position capacity is resolution squared.
    pub resolution: u32,
    /// Length of the triangle-index buffer (3 per triangle).
    pub triangles_count: u32,
    pub points_per_triangle: u32,
    pub positions_count: u32,
    /// Uniform scale normalizing the mesh into the visual envelope.
    pub scale: f32,
    /// Eased transition progress in [0, 1]; unused by the sample pass.
    pub transition_progress: f32,
    pub _padding: [u32; 2],
}

/// GPU compute kernel for sampling points on a mesh surface and morphing
/// them toward another mesh.
pub struct MorphKernel {
    device: Arc<Device>,
    queue: Arc<Queue>,
    sample_pipeline: ComputePipeline,
    transform_pipeline: ComputePipeline,
    bind_group_layout: BindGroupLayout,
    params_buffer: wgpu::Buffer,
}

impl MorphKernel {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>) -> Self {
        let shader_source = include_str!("../../shaders/compute/point_morph.wgsl");
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Morph Kernel"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Point Morph Layout"),
            entries: &[
                // Kernel parameters
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Mesh vertices
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Triangle indices
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Sampled positions (written in place by both passes)
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Morph Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let sample_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Point Sample Pipeline"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: "sample",
        });

        let transform_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Point Transform Pipeline"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: "transform",
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Kernel Params"),
            size: std::mem::size_of::<KernelParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!("[MorphKernel] Compute pipelines created (sample, transform)");

        Self {
            device,
            queue,
            sample_pipeline,
            transform_pipeline,
            bind_group_layout,
            params_buffer,
        }
    }

    /// Bind the set's current buffers. Recreated after every mirror swap or
    /// position reallocation; stale bind groups must not outlive a release.
    pub fn bind(&self, buffers: &MeshBufferSet) -> MorphResult<BindGroup> {
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Point Morph Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.vertex_buffer()?.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffers.triangle_buffer()?.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: buffers.positions()?.as_entire_binding(),
                },
            ],
        });
        Ok(bind_group)
    }

    /// Dispatch the one-shot sampling pass.
    pub fn dispatch_sample(&self, bind_group: &BindGroup, params: KernelParams, plan: DispatchParams) {
        self.dispatch(&self.sample_pipeline, "Point Sample Pass", bind_group, params, plan);
    }

    /// Dispatch one transform tick of an active transition.
    pub fn dispatch_transform(
        &self,
        bind_group: &BindGroup,
        params: KernelParams,
        plan: DispatchParams,
    ) {
        self.dispatch(
            &self.transform_pipeline,
            "Point Transform Pass",
            bind_group,
            params,
            plan,
        );
    }

    fn dispatch(
        &self,
        pipeline: &ComputePipeline,
        label: &str,
        bind_group: &BindGroup,
        params: KernelParams,
        plan: DispatchParams,
    ) {
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Point Morph Encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(label),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(pipeline);
            compute_pass.set_bind_group(0, bind_group, &[]);
            compute_pass.dispatch_workgroups(plan.group_x, plan.group_y, 1);
        }

        // Fire-and-forget: the backend serializes this before any draw that
        // reads the position buffer.
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}
