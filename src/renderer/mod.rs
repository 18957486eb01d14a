/// Renderer Module
///
/// The per-frame instanced draw of the live point prefix. Reads whatever
/// buffer and count the transition engine exposes; never mutates them.
pub mod point_renderer;

pub use point_renderer::PointCloudRenderer;
