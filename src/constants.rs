//! Central constants for the morph engine
//!
//! Tuning values live here so the kernel planners, the transition state
//! machine, and the render step formula agree on a single source of truth.

/// Point sampling limits and kernel tiling.
pub mod sampling {
    /// Minimum supported sampling resolution.
    pub const MIN_RESOLUTION: u32 = 10;

    /// Maximum supported sampling resolution.
    pub const MAX_RESOLUTION: u32 = 1000;

    /// Kernel workgroup edge; dispatches tile triangles and points in
    /// batches of this size on both axes.
    pub const KERNEL_GROUP_SIZE: u32 = 10;

    /// Reciprocal of the triangle-index stride (3 indices per triangle)
    /// as used by the transform-pass planner. Deliberately the literal
    /// 0.33333 rather than 1.0/3.0: the rounding drift it produces in
    /// point counts is part of the observed visual behavior.
    pub const INV_INDEX_STRIDE: f32 = 0.33333;

    /// Reciprocal of (index stride * group size) for transform group_x.
    pub const INV_INDEX_GROUP: f32 = 0.033333;

    /// Reciprocal of the group size for transform group_y.
    pub const INV_POINT_GROUP: f32 = 0.1;

    /// Bytes per sampled position (3 packed f32).
    pub const POSITION_STRIDE: u64 = 12;
}

/// Transition cycle timing, in seconds of wall-clock time.
pub mod timing {
    /// Duration of the eased morph between two meshes.
    pub const TRANSITION_DURATION: f32 = 2.0;

    /// Steady-state hold after a transition completes.
    pub const HOLD_DURATION: f32 = 1.5;

    /// Pause between the state commit and the next transition.
    pub const COMMIT_PAUSE: f32 = 0.5;

    /// Overshoot amplitude for the ease-in-back curve.
    pub const BACK_OVERSHOOT: f32 = 0.6;
}

/// Mesh scale normalization envelope.
pub mod scale {
    /// Lower bound of the visual size band, in world units.
    pub const ENVELOPE_MIN: f32 = 4.0;

    /// Upper bound of the visual size band, in world units.
    pub const ENVELOPE_MAX: f32 = 5.0;
}

/// Render step (point visual size) tuning bounds.
///
/// The step divides 2.0 by a density-dependent lerp between two bounds.
/// The coarse bound differs between the sampling path (950) and the
/// transitioning path (300); the asymmetry is intentional tuning.
pub mod step {
    pub const STEP_NUMERATOR: f32 = 2.0;
    pub const SAMPLING_COARSE_BOUND: f32 = 950.0;
    pub const TRANSITION_COARSE_BOUND: f32 = 300.0;
    pub const FINE_BOUND: f32 = 250.0;
}
