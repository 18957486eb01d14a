//! Error handling for the morph engine
//!
//! Configuration problems are rejected at activation time; resource
//! problems are fatal to the component. There is no mid-transition retry
//! policy: a failed allocation surfaces here and the transition freezes.

/// Crate-wide result type.
pub type MorphResult<T> = Result<T, MorphError>;

/// Main error type for the morph engine.
#[derive(Debug, thiserror::Error)]
pub enum MorphError {
    // Configuration errors
    #[error("resolution {value} outside supported range [10, 1000]")]
    ResolutionOutOfRange { value: u32 },

    #[error("mesh collection needs at least 2 meshes, got {count}")]
    NotEnoughMeshes { count: usize },

    #[error("mesh '{name}' has no complete triangles ({index_count} indices)")]
    EmptyMesh { name: String, index_count: usize },

    #[error("mesh '{name}' has malformed triangle indices: {detail}")]
    MalformedIndices { name: String, detail: String },

    #[error("mesh '{name}' has degenerate bounds (magnitude {magnitude})")]
    DegenerateBounds { name: String, magnitude: f32 },

    // Resource errors
    #[error("buffer '{label}' of {size} bytes exceeds device limit of {limit} bytes")]
    BufferTooLarge {
        label: &'static str,
        size: u64,
        limit: u64,
    },

    #[error("no sampled-position buffer is allocated")]
    PositionsNotAllocated,

    #[error("no mesh mirrors are bound")]
    MirrorsNotBound,

    #[error("no suitable GPU adapter found")]
    AdapterNotFound,

    #[error("GPU device request failed: {0}")]
    DeviceRequest(String),
}
