//! Render step derivation - pure functions
//!
//! The "step" is the point visual size fed to the material, derived from
//! the ratio of sampling resolution to the smoothed vertex density. The
//! sampling path lerps its divisor from 950, the transitioning path from
//! 300; the asymmetry is deliberate visual tuning and preserved exactly.

use crate::constants::step::{
    FINE_BOUND, SAMPLING_COARSE_BOUND, STEP_NUMERATOR, TRANSITION_COARSE_BOUND,
};

fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Step after the one-shot sampling pass and while holding.
pub fn sampling_step(resolution: u32, vertex_count: f32) -> f32 {
    let density = resolution as f32 / vertex_count;
    STEP_NUMERATOR / lerp_clamped(SAMPLING_COARSE_BOUND, FINE_BOUND, density)
}

/// Step during a transitioning tick.
pub fn transition_step(resolution: u32, vertex_count: f32) -> f32 {
    let density = resolution as f32 / vertex_count;
    STEP_NUMERATOR / lerp_clamped(TRANSITION_COARSE_BOUND, FINE_BOUND, density)
}
