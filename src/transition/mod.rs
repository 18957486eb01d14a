/// Transition Module - Data-Oriented Programming (DOP) style
///
/// - transition_data.rs: pure state, no methods
/// - transition_operations.rs: pure phase/blend functions
/// - controller.rs: the GPU-owning driver interpreting phase actions
/// - easing.rs / render_step.rs: the curves and step formula
pub mod controller;
pub mod easing;
pub mod render_step;
pub mod transition_data;
pub mod transition_operations;

pub use controller::MorphController;
pub use easing::EasingKind;
pub use render_step::{sampling_step, transition_step};
pub use transition_data::{TransitionPhase, TransitionState};
pub use transition_operations::{
    advance, begin_transition, blend_point_count, blend_vertex_count, commit, select_target,
    PhaseAction,
};
