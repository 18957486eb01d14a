//! Headless GPU context acquisition
//!
//! Hosts that already own a surface can construct the engine from their own
//! device/queue; this helper covers tools and integration tests that need a
//! device without a window.

use std::sync::Arc;

use crate::error::{MorphError, MorphResult};

/// Shared device/queue pair the engine components hang off.
pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    /// Wrap a host-owned device and queue.
    pub fn from_device(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self { device, queue }
    }

    /// Acquire a headless device, blocking on the async adapter/device
    /// requests.
    pub fn new_headless() -> MorphResult<Self> {
        pollster::block_on(Self::request_headless())
    }

    async fn request_headless() -> MorphResult<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(MorphError::AdapterNotFound)?;

        log::info!(
            "[GpuContext] Using adapter: {}",
            adapter.get_info().name
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Morph Engine Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .map_err(|e| MorphError::DeviceRequest(e.to_string()))?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// Headless context with caller-chosen limits, for tests that need to
    /// trip the buffer size checks against a real device. `None` when no
    /// adapter is available so such tests can skip instead of failing.
    #[cfg(test)]
    pub(crate) fn new_headless_with_limits(limits: wgpu::Limits) -> Option<Self> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await?;
            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("Morph Engine Test Device"),
                        required_features: wgpu::Features::empty(),
                        required_limits: limits,
                    },
                    None,
                )
                .await
                .ok()?;
            Some(Self {
                device: Arc::new(device),
                queue: Arc::new(queue),
            })
        })
    }
}
