/// Body selection — pointer to renderable to catalog entry.

use std::collections::HashMap;

use glam::Vec2;
use orrery_engine::{Camera3D, RenderBackend, RenderableId, Throttle};

use crate::propagator;
use crate::state::OrbitalStore;

/// A body or one of its moons, by catalog position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Body(usize),
    Moon { body: usize, moon: usize },
}

impl Selection {
    /// Build from the UI's (body, moon-or-negative) pair.
    pub fn from_indices(body: i32, moon: i32) -> Option<Self> {
        let body = usize::try_from(body).ok()?;
        Some(match usize::try_from(moon) {
            Ok(moon) => Selection::Moon { body, moon },
            Err(_) => Selection::Body(body),
        })
    }

    /// (body, moon) with -1 for "none", as sent in game events.
    pub fn indices(selection: Option<Self>) -> (f32, f32) {
        match selection {
            None => (-1.0, -1.0),
            Some(Selection::Body(b)) => (b as f32, -1.0),
            Some(Selection::Moon { body, moon }) => (body as f32, moon as f32),
        }
    }
}

/// Renderable handle to owner and back, built once at scene construction.
#[derive(Debug, Clone, Default)]
pub struct PickIndex {
    by_renderable: HashMap<RenderableId, Selection>,
    by_selection: HashMap<Selection, RenderableId>,
    candidates: Vec<RenderableId>,
}

impl PickIndex {
    pub fn build(store: &OrbitalStore) -> Self {
        let mut index = Self::default();
        for (id, body, moon) in propagator::pickable(store) {
            let selection = match moon {
                Some(moon) => Selection::Moon { body, moon },
                None => Selection::Body(body),
            };
            index.by_renderable.insert(id, selection);
            index.by_selection.insert(selection, id);
            index.candidates.push(id);
        }
        index
    }

    pub fn resolve(&self, id: RenderableId) -> Option<Selection> {
        self.by_renderable.get(&id).copied()
    }

    pub fn renderable(&self, selection: Selection) -> Option<RenderableId> {
        self.by_selection.get(&selection).copied()
    }

    pub fn contains(&self, selection: Selection) -> bool {
        self.by_selection.contains_key(&selection)
    }

    /// Every pickable renderable.
    pub fn candidates(&self) -> &[RenderableId] {
        &self.candidates
    }
}

/// Pointer position in CSS pixels to normalized device coordinates.
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(x / width * 2.0 - 1.0, -(y / height * 2.0 - 1.0))
}

/// Nearest body or moon under `ndc`. A miss is `None`.
pub fn pick(index: &PickIndex, backend: &impl RenderBackend, camera: &Camera3D, ndc: Vec2) -> Option<Selection> {
    let hit = backend.cast_ray(camera, ndc, index.candidates())?;
    index.resolve(hit.id)
}

/// Rate-limited picking for hover feedback.
#[derive(Debug, Clone)]
pub struct HoverPicker {
    throttle: Throttle,
    current: Option<Selection>,
}

impl HoverPicker {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            throttle: Throttle::new(interval_ms),
            current: None,
        }
    }

    /// Re-pick if the throttle allows; otherwise keep the last result.
    /// Returns true when a fresh pick ran.
    pub fn update(
        &mut self,
        now_ms: f64,
        index: &PickIndex,
        backend: &impl RenderBackend,
        camera: &Camera3D,
        ndc: Vec2,
    ) -> bool {
        if !self.throttle.ready(now_ms) {
            return false;
        }
        self.current = pick(index, backend, camera, ndc);
        true
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<Selection> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::propagator::Propagator;
    use crate::scale::ScaleMode;
    use crate::state::GlobalClock;
    use glam::Vec3;
    use orrery_engine::{Rng, Scene};

    // Realistic mode keeps the bodies apart; compressed radii overlap.
    fn scene_with_bodies() -> (OrbitalStore, PickIndex, Scene) {
        let catalog = Catalog::builtin().unwrap();
        let mut scene = Scene::new();
        let mut rng = Rng::new(1);
        let clock = GlobalClock {
            mode: ScaleMode::Realistic,
            ..GlobalClock::default()
        };
        let store = Propagator::new(64)
            .spawn(&catalog, clock, &mut scene, &mut rng)
            .unwrap();
        let index = PickIndex::build(&store);
        (store, index, scene)
    }

    fn camera_looking_at(target: Vec3, from: Vec3) -> Camera3D {
        let mut camera = Camera3D::new(60.0, 1.0, 0.1, 1.0e6);
        camera.position = from;
        camera.look_at(target);
        camera
    }

    #[test]
    fn index_is_bidirectional() {
        let (store, index, _) = scene_with_bodies();
        assert_eq!(index.candidates().len(), 22);
        let moon = Selection::Moon { body: 3, moon: 0 };
        let id = index.renderable(moon).unwrap();
        assert_eq!(id, store.bodies[3].moons[0].renderable);
        assert_eq!(index.resolve(id), Some(moon));
        assert!(!index.contains(Selection::Body(99)));
    }

    #[test]
    fn empty_space_is_no_selection() {
        let (_, index, scene) = scene_with_bodies();
        let camera = camera_looking_at(Vec3::new(0.0, 1000.0, 0.0), Vec3::new(0.0, 900.0, 0.0));
        assert_eq!(pick(&index, &scene, &camera, Vec2::ZERO), None);
    }

    #[test]
    fn single_hit_resolves_to_owner() {
        let (store, index, scene) = scene_with_bodies();
        let neptune = store.bodies[8].position.as_vec3();
        let camera = camera_looking_at(neptune, neptune + Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(pick(&index, &scene, &camera, Vec2::ZERO), Some(Selection::Body(8)));
    }

    #[test]
    fn nearest_of_overlapping_hits_wins() {
        let (store, index, scene) = scene_with_bodies();
        // Looking at the sun from beyond Mercury: both are on the ray.
        let mercury = store.bodies[1].position.as_vec3();
        let camera = camera_looking_at(Vec3::ZERO, mercury * 2.0);
        assert_eq!(pick(&index, &scene, &camera, Vec2::ZERO), Some(Selection::Body(1)));
        let sun_id = index.renderable(Selection::Body(0)).unwrap();
        assert!(scene.cast_ray(&camera, Vec2::ZERO, &[sun_id]).is_some());
    }

    #[test]
    fn ndc_maps_corners() {
        assert_eq!(pointer_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
        assert_eq!(pointer_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn hover_is_throttled() {
        let (store, index, scene) = scene_with_bodies();
        let sun_cam = camera_looking_at(Vec3::ZERO, Vec3::new(0.0, 20.0, 0.01));
        let mut hover = HoverPicker::new(100.0);
        assert!(hover.update(0.0, &index, &scene, &sun_cam, Vec2::ZERO));
        assert_eq!(hover.current(), Some(Selection::Body(0)));

        let neptune = store.bodies[8].position.as_vec3();
        let nep_cam = camera_looking_at(neptune, neptune + Vec3::new(0.0, 5.0, 0.01));
        // Inside the window the stale result stands.
        assert!(!hover.update(50.0, &index, &scene, &nep_cam, Vec2::ZERO));
        assert_eq!(hover.current(), Some(Selection::Body(0)));
        assert!(hover.update(120.0, &index, &scene, &nep_cam, Vec2::ZERO));
        assert_eq!(hover.current(), Some(Selection::Body(8)));
        hover.clear();
        assert_eq!(hover.current(), None);
    }

    #[test]
    fn ui_indices_round_trip() {
        assert_eq!(Selection::from_indices(3, -1), Some(Selection::Body(3)));
        assert_eq!(Selection::from_indices(5, 2), Some(Selection::Moon { body: 5, moon: 2 }));
        assert_eq!(Selection::from_indices(-1, -1), None);
        assert_eq!(Selection::indices(Some(Selection::Moon { body: 5, moon: 2 })), (5.0, 2.0));
        assert_eq!(Selection::indices(None), (-1.0, -1.0));
    }
}
