// extensions/transition.rs
//
// Frame-driven position transition for the camera.
// A new request cancels and replaces whatever is in flight.
//
// Usage:
//   transition.start(ctx.frame(), camera.position, goal, 30);
//   if let Some(pos) = transition.step(ctx.frame()) { camera.position = pos; }

use glam::Vec3;

use super::easing::{ease_vec3, Easing};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    Transitioning {
        start_frame: u64,
        /// Length in display frames (at least 1).
        duration: u32,
        from: Vec3,
        to: Vec3,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CameraTransition {
    state: TransitionState,
    easing: Easing,
}

impl CameraTransition {
    pub fn new(easing: Easing) -> Self {
        Self {
            state: TransitionState::Idle,
            easing,
        }
    }

    /// Begin a transition at `frame`. Replaces any transition in progress.
    pub fn start(&mut self, frame: u64, from: Vec3, to: Vec3, duration: u32) {
        self.state = TransitionState::Transitioning {
            start_frame: frame,
            duration: duration.max(1),
            from,
            to,
        };
    }

    /// Drop the in-flight transition, leaving the camera where it is.
    /// Returns true if something was cancelled.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = TransitionState::Idle;
        was_active
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TransitionState::Transitioning { .. })
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Position for `frame`, or `None` when idle. The step that reaches the
    /// duration yields exactly `to` and returns the machine to idle.
    pub fn step(&mut self, frame: u64) -> Option<Vec3> {
        let TransitionState::Transitioning { start_frame, duration, from, to } = self.state else {
            return None;
        };
        let elapsed = frame.saturating_sub(start_frame);
        if elapsed >= duration as u64 {
            self.state = TransitionState::Idle;
            return Some(to);
        }
        let t = elapsed as f32 / duration as f32;
        Some(ease_vec3(from, to, t, self.easing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_yields_nothing() {
        let mut tr = CameraTransition::new(Easing::QuadInOut);
        assert_eq!(tr.step(10), None);
        assert!(!tr.cancel());
    }

    #[test]
    fn runs_for_duration_then_idles() {
        let mut tr = CameraTransition::new(Easing::Linear);
        let to = Vec3::new(30.0, 0.0, 0.0);
        tr.start(100, Vec3::ZERO, to, 30);

        let mid = tr.step(115).unwrap();
        assert!((mid.x - 15.0).abs() < 1e-4);
        assert!(tr.is_active());

        assert_eq!(tr.step(130), Some(to));
        assert_eq!(tr.state(), TransitionState::Idle);
        assert_eq!(tr.step(131), None);
    }

    #[test]
    fn quad_in_out_midpoint() {
        let mut tr = CameraTransition::new(Easing::QuadInOut);
        tr.start(0, Vec3::ZERO, Vec3::splat(8.0), 30);
        let p = tr.step(7).unwrap();
        let expected = 8.0 * Easing::QuadInOut.apply(7.0 / 30.0);
        assert!((p.y - expected).abs() < 1e-4);
    }

    #[test]
    fn new_request_replaces_in_flight() {
        let mut tr = CameraTransition::new(Easing::Linear);
        tr.start(0, Vec3::ZERO, Vec3::X * 10.0, 30);
        let here = tr.step(10).unwrap();
        tr.start(10, here, Vec3::Z * 10.0, 30);
        let end = tr.step(40).unwrap();
        assert_eq!(end, Vec3::Z * 10.0);
    }

    #[test]
    fn cancel_stops_motion() {
        let mut tr = CameraTransition::new(Easing::Linear);
        tr.start(0, Vec3::ZERO, Vec3::ONE, 30);
        assert!(tr.cancel());
        assert_eq!(tr.step(5), None);
    }
}
