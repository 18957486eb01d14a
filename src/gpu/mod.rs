/// GPU Module
///
/// Buffer ownership, dispatch planning, scale normalization, and the
/// compute-kernel wrapper. Planning functions are pure; everything touching
/// wgpu lives in `buffer_set`, `kernel`, and `context`.
pub mod buffer_set;
pub mod context;
pub mod dispatch;
pub mod kernel;
pub mod scale;

pub use buffer_set::{position_buffer_size, MeshBufferSet};
pub use context::GpuContext;
pub use dispatch::{plan_sampling, plan_transform, DispatchParams};
pub use kernel::{KernelParams, MorphKernel};
pub use scale::normalize_scale;
