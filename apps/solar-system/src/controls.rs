/// Camera controls: drag to orbit, wheel to zoom, eased focus and reset.
///
/// Drags and zooms pivot on the origin. A press that never travels past the
/// drag threshold is a click.

use glam::{Vec2, Vec3};
use orrery_engine::{Camera3D, CameraTransition, Easing};

use crate::config::ExplorerConfig;
use crate::scale::ScaleMode;
use crate::selection::Selection;

/// Keeps the camera off the poles.
const MIN_POLAR: f32 = 0.1;
/// Focus distance along each axis, in body radii.
const FOCUS_RADII: f32 = 5.0;

/// Camera distance from the origin the wheel may reach, exclusive.
pub fn zoom_range(mode: ScaleMode) -> (f32, f32) {
    match mode {
        ScaleMode::Realistic => (0.1, 500.0),
        ScaleMode::Compressed => (1.0, 150.0),
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start: Vec2,
    last: Vec2,
    dragging: bool,
}

/// What the camera looks at while a transition is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookTarget {
    Origin,
    Body(Selection),
}

pub struct CameraRig {
    transition: CameraTransition,
    look: LookTarget,
    home: Vec3,
    duration: u32,
    drag_threshold: f32,
    sensitivity: f32,
    zoom_step: f32,
    press: Option<Press>,
}

impl CameraRig {
    pub fn new(config: &ExplorerConfig) -> Self {
        Self {
            transition: CameraTransition::new(Easing::QuadInOut),
            look: LookTarget::Origin,
            home: Vec3::from_array(config.home_position),
            duration: config.transition_frames,
            drag_threshold: config.drag_threshold_px,
            sensitivity: config.drag_sensitivity,
            zoom_step: config.zoom_step,
            press: None,
        }
    }

    pub fn home(&self) -> Vec3 {
        self.home
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_active()
    }

    pub fn look_target(&self) -> LookTarget {
        self.look
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let at = Vec2::new(x, y);
        self.press = Some(Press { start: at, last: at, dragging: false });
    }

    /// Orbit the camera once the press has become a drag.
    /// Returns true if the camera moved.
    pub fn pointer_move(&mut self, x: f32, y: f32, camera: &mut Camera3D) -> bool {
        let Some(press) = &mut self.press else {
            return false;
        };
        let at = Vec2::new(x, y);
        if !press.dragging && at.distance(press.start) > self.drag_threshold {
            press.dragging = true;
        }
        if !press.dragging {
            return false;
        }
        let delta = at - press.last;
        press.last = at;

        if self.transition.cancel() {
            log::debug!("camera transition cancelled by drag");
        }
        self.look = LookTarget::Origin;
        camera.orbit_around(Vec3::ZERO, delta.x * self.sensitivity, delta.y * self.sensitivity, MIN_POLAR)
    }

    /// End the press. Returns the click position if it never became a drag.
    pub fn pointer_up(&mut self, x: f32, y: f32) -> Option<Vec2> {
        let press = self.press.take()?;
        (!press.dragging).then_some(Vec2::new(x, y))
    }

    /// Zoom by one notch; positive `delta` moves away. Returns true if applied.
    pub fn wheel(&mut self, delta: f32, mode: ScaleMode, camera: &mut Camera3D) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        if self.transition.cancel() {
            log::debug!("camera transition cancelled by zoom");
        }
        self.look = LookTarget::Origin;
        let (min, max) = zoom_range(mode);
        camera.zoom_around(Vec3::ZERO, delta, self.zoom_step, min, max)
    }

    /// Ease toward `body_pos + (d, d, d)`, `d` five render radii.
    /// Replaces any transition in flight.
    pub fn focus(&mut self, frame: u64, camera: &Camera3D, selection: Selection, body_pos: Vec3, radius: f32) {
        let goal = body_pos + Vec3::splat(radius * FOCUS_RADII);
        self.transition.start(frame, camera.position, goal, self.duration);
        self.look = LookTarget::Body(selection);
        log::debug!("focus {selection:?} -> {goal}");
    }

    /// Ease back to the home position, looking at the origin.
    pub fn reset(&mut self, frame: u64, camera: &Camera3D) {
        self.transition.start(frame, camera.position, self.home, self.duration);
        self.look = LookTarget::Origin;
        log::debug!("camera reset");
    }

    /// Advance the transition for `frame`. `locate` gives the live position of
    /// a focused body; a body that no longer resolves falls back to the origin.
    pub fn step(&mut self, frame: u64, camera: &mut Camera3D, locate: impl Fn(Selection) -> Option<Vec3>) {
        let Some(pos) = self.transition.step(frame) else {
            return;
        };
        camera.position = pos;
        let target = match self.look {
            LookTarget::Origin => Vec3::ZERO,
            LookTarget::Body(selection) => locate(selection).unwrap_or_else(|| {
                log::warn!("focused body {selection:?} no longer resolves");
                Vec3::ZERO
            }),
        };
        camera.look_at(target);
    }
}
