//! Transition state - Pure DOP
//!
//! NO METHODS beyond constructors. Just data.
//! All transformations happen in transition_operations.rs.

use crate::transition::easing::EasingKind;

/// Which leg of the perpetual cycle the controller is on.
///
/// Replaces the original callback-chained scheduling with an explicit
/// state machine driven once per frame by `advance(delta_time)`. All
/// waiting is expressed as countdowns resumed on subsequent ticks; nothing
/// blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    /// Only before activation and after deactivation. `advance` is a no-op
    /// here, which is what makes deactivation a safe cancellation point.
    Idle,
    /// Eased morph in progress; `elapsed` is wall-clock seconds since the
    /// transition started.
    Transitioning { elapsed: f32 },
    /// Steady state after a completed morph, counting down to the commit.
    Holding { remaining: f32 },
    /// Post-commit pause, counting down to the next transition.
    Paused { remaining: f32 },
}

/// Mutable per-cycle state, owned by one controller instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    /// Index of the committed source mesh. `None` until the first
    /// transition commits (the original kept a -1 sentinel here).
    pub current_mesh: Option<usize>,
    /// Index of the mesh being sampled or morphed toward.
    pub target_mesh: usize,
    pub is_transitioning: bool,
    /// Eased progress of the active transition, in [0, 1].
    pub transition_timer: f32,
    /// Live instance count for the frame's draw call.
    pub total_points: u32,
    /// Smoothed vertex-density estimate; tracks the target's vertex count
    /// continuously rather than snapping.
    pub vertex_count: f32,
    /// Point visual size fed to the render material.
    pub step: f32,
    pub phase: TransitionPhase,
    pub easing: EasingKind,
}

impl TransitionState {
    pub fn new() -> Self {
        Self {
            current_mesh: None,
            target_mesh: 0,
            is_transitioning: false,
            transition_timer: 0.0,
            total_points: 0,
            vertex_count: 0.0,
            step: 0.0,
            phase: TransitionPhase::Idle,
            easing: EasingKind::InCubic,
        }
    }
}

impl Default for TransitionState {
    fn default() -> Self {
        Self::new()
    }
}
