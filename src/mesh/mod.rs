/// Mesh Module
///
/// Immutable CPU-side mesh inputs. The engine only reads these; the host
/// environment owns the collection and supplies it at activation.
pub mod mesh_data;

pub use mesh_data::MeshAsset;
