// extensions/mod.rs
//
// Optional extension modules for the engine.
// These are decoupled from Scene — games opt in by owning them.

pub mod easing;
pub mod transition;

pub use easing::{ease_vec3, lerp, lerp_vec3, Easing};
pub use transition::{CameraTransition, TransitionState};
