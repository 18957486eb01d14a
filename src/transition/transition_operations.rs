//! Transition operations - Pure DOP functions
//!
//! The whole cycle (eased morph, hold, commit, pause, next target) is
//! expressed as pure transformations of `TransitionState`, so the sequencing
//! logic tests without a GPU. The controller interprets the returned
//! `PhaseAction` into actual buffer work and kernel dispatches.

use rand::Rng;

use crate::constants::timing::{COMMIT_PAUSE, HOLD_DURATION, TRANSITION_DURATION};
use crate::transition::easing::EasingKind;
use crate::transition::transition_data::{TransitionPhase, TransitionState};

/// GPU work the controller must perform after an `advance` tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAction {
    /// Nothing to dispatch this frame.
    None,
    /// Dispatch a transform tick at the freshly eased `transition_timer`.
    TickTransform,
    /// Rebind mirrors for `state.target_mesh` and start its morph.
    BeginTransition,
}

// ============================================================================
// TARGET SELECTION
// ============================================================================

/// Rejection-sample a target index, excluding at most one index. The
/// collection is validated to hold at least 2 meshes, so the loop always
/// terminates.
pub fn select_target<R: Rng + ?Sized>(
    rng: &mut R,
    mesh_count: usize,
    exclude: Option<usize>,
) -> usize {
    loop {
        let candidate = rng.gen_range(0..mesh_count);
        if Some(candidate) != exclude {
            return candidate;
        }
    }
}

/// Set up a fresh transition toward a newly selected target: pick the
/// target (excluding `exclude`), pick an easing curve, zero the timer.
/// Returns the chosen target index.
pub fn begin_transition<R: Rng + ?Sized>(
    state: &mut TransitionState,
    rng: &mut R,
    mesh_count: usize,
    exclude: Option<usize>,
) -> usize {
    let target = select_target(rng, mesh_count, exclude);
    state.target_mesh = target;
    state.is_transitioning = true;
    state.transition_timer = 0.0;
    state.easing = EasingKind::pick(rng);
    state.phase = TransitionPhase::Transitioning { elapsed: 0.0 };
    target
}

/// Commit a completed transition: the morph target becomes the source.
pub fn commit(state: &mut TransitionState) {
    state.current_mesh = Some(state.target_mesh);
    state.is_transitioning = false;
}

// ============================================================================
// PER-FRAME ADVANCE
// ============================================================================

/// Advance the cycle by `delta_time` seconds. Exactly one phase leg runs
/// per call; all waiting is countdown state, never a blocking sleep.
pub fn advance<R: Rng + ?Sized>(
    state: &mut TransitionState,
    delta_time: f32,
    rng: &mut R,
    mesh_count: usize,
) -> PhaseAction {
    match state.phase {
        TransitionPhase::Idle => PhaseAction::None,

        TransitionPhase::Transitioning { elapsed } => {
            let elapsed = elapsed + delta_time;
            let raw = (elapsed / TRANSITION_DURATION).min(1.0);
            state.transition_timer = state.easing.evaluate(raw);

            state.phase = if elapsed >= TRANSITION_DURATION {
                TransitionPhase::Holding {
                    remaining: HOLD_DURATION,
                }
            } else {
                TransitionPhase::Transitioning { elapsed }
            };
            // The completion tick still dispatches, at raw progress 1
            PhaseAction::TickTransform
        }

        TransitionPhase::Holding { remaining } => {
            let remaining = remaining - delta_time;
            if remaining <= 0.0 {
                commit(state);
                state.phase = TransitionPhase::Paused {
                    remaining: COMMIT_PAUSE,
                };
            } else {
                state.phase = TransitionPhase::Holding { remaining };
            }
            PhaseAction::None
        }

        TransitionPhase::Paused { remaining } => {
            let remaining = remaining - delta_time;
            if remaining <= 0.0 {
                begin_transition(state, rng, mesh_count, state.current_mesh);
                PhaseAction::BeginTransition
            } else {
                state.phase = TransitionPhase::Paused { remaining };
                PhaseAction::None
            }
        }
    }
}

// ============================================================================
// POINT / VERTEX COUNT BLENDS
// ============================================================================

fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Asymmetric point-count easing, independent of the geometric easing of
/// the timer itself. Shrinking counts collapse in the first quarter of the
/// transition and freeze; growing counts stay frozen until the halfway
/// mark and then ramp over the last half. Smooths points popping in or out.
pub fn blend_point_count(current: u32, candidate: u32, timer: f32) -> u32 {
    if candidate < current {
        if timer * 4.0 <= 1.0 {
            lerp_clamped(current as f32, candidate as f32, timer * 4.0) as u32
        } else {
            current
        }
    } else {
        let progress = (timer - 0.5) * 4.0;
        if timer >= 0.5 && progress <= 1.0 {
            lerp_clamped(current as f32, candidate as f32, progress) as u32
        } else {
            current
        }
    }
}

/// Smoothed vertex-density estimate: eased toward the target's true count
/// by the timer rather than snapping.
pub fn blend_vertex_count(current: f32, target_vertex_count: u32, timer: f32) -> f32 {
    lerp_clamped(current, target_vertex_count as f32, timer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn drive(state: &mut TransitionState, rng: &mut StdRng, seconds: f32, dt: f32) {
        let steps = (seconds / dt).round() as usize;
        for _ in 0..steps {
            advance(state, dt, rng, 3);
        }
    }

    #[test]
    fn select_target_never_returns_excluded() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            assert_ne!(select_target(&mut rng, 2, Some(1)), 1);
        }
    }

    #[test]
    fn idle_advance_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = TransitionState::new();
        let before = state;
        assert_eq!(advance(&mut state, 0.016, &mut rng, 3), PhaseAction::None);
        assert_eq!(state, before);
    }

    #[test]
    fn full_cycle_commits_the_transition_target() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = TransitionState::new();
        let target = begin_transition(&mut state, &mut rng, 3, Some(0));
        assert_ne!(target, 0);
        assert!(state.is_transitioning);

        // 2.0s morph
        drive(&mut state, &mut rng, 2.0, 0.05);
        assert!(matches!(state.phase, TransitionPhase::Holding { .. }));
        assert!(state.is_transitioning);
        assert!((state.transition_timer - 1.0).abs() < 1e-3);

        // 1.5s hold, then the commit
        drive(&mut state, &mut rng, 1.5, 0.05);
        assert!(matches!(state.phase, TransitionPhase::Paused { .. }));
        assert_eq!(state.current_mesh, Some(target));
        assert!(!state.is_transitioning);

        // 0.5s pause, then the next transition begins on its own
        drive(&mut state, &mut rng, 0.5, 0.05);
        assert!(matches!(state.phase, TransitionPhase::Transitioning { .. }));
        assert!(state.is_transitioning);
        assert_ne!(state.target_mesh, target, "rejection sampling re-picked the source");
    }

    #[test]
    fn transitioning_ticks_request_transform_dispatch() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = TransitionState::new();
        begin_transition(&mut state, &mut rng, 3, None);
        assert_eq!(
            advance(&mut state, 0.016, &mut rng, 3),
            PhaseAction::TickTransform
        );
    }

    #[test]
    fn shrink_blend_is_non_increasing_in_first_quarter() {
        let mut count = 1000u32;
        let mut previous = count;
        let mut timer = 0.0;
        while timer <= 0.25 {
            count = blend_point_count(count, 200, timer);
            assert!(count <= previous, "count grew during shrink at t={timer}");
            previous = count;
            timer += 0.01;
        }
        // Frozen for the remaining three quarters
        let frozen = count;
        assert_eq!(blend_point_count(count, 200, 0.6), frozen);
    }

    #[test]
    fn grow_blend_is_non_decreasing_in_last_half() {
        let mut count = 200u32;
        // Frozen before the halfway mark
        assert_eq!(blend_point_count(count, 1000, 0.49), 200);

        let mut previous = count;
        let mut timer = 0.5;
        while timer <= 1.0 {
            count = blend_point_count(count, 1000, timer);
            assert!(count >= previous, "count shrank during grow at t={timer}");
            previous = count;
            timer += 0.01;
        }
        assert!(count >= 990, "grow blend stalled at {count}");
        // Exactly three quarters in, the ramp factor hits 1
        assert_eq!(blend_point_count(200, 1000, 0.75), 1000);
    }

    #[test]
    fn vertex_blend_tracks_target() {
        let blended = blend_vertex_count(100.0, 300, 0.5);
        assert!((blended - 200.0).abs() < 1e-4);
        assert!((blend_vertex_count(100.0, 300, 1.0) - 300.0).abs() < 1e-4);
    }
}
