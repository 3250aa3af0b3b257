/// The simulation context: catalog, orbital store, scenery, picking and the
/// UI-facing flags, owned together and passed explicitly.

use glam::Vec3;
use orrery_engine::{EngineResult, RenderBackend, RenderableId, Rng};
use serde::Serialize;

use crate::catalog::{BodyKind, Catalog};
use crate::config::ExplorerConfig;
use crate::format::BodyInfo;
use crate::propagator::Propagator;
use crate::scale::ScaleMode;
use crate::scenery::{spawn_starfield, AsteroidBelt, SunGlow};
use crate::selection::{PickIndex, Selection};
use crate::state::{GlobalClock, OrbitalStore};

/// Hover label text and where to draw it, in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverLabel {
    pub name: String,
    pub x: f32,
    pub y: f32,
}

/// Everything the page needs to draw its panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiSnapshot<'a> {
    pub scale_mode: ScaleMode,
    pub scale_label: &'static str,
    pub playing: bool,
    pub speed: f64,
    pub ticks: u64,
    pub labels_visible: bool,
    pub trails_visible: bool,
    pub selected: Option<BodyInfo>,
    pub hover: Option<&'a HoverLabel>,
}

pub struct Orrery {
    catalog: Catalog,
    propagator: Propagator,
    store: OrbitalStore,
    star: Option<usize>,
    belt: Option<AsteroidBelt>,
    glow: Option<SunGlow>,
    starfield: RenderableId,
    picks: PickIndex,
    selection: Option<Selection>,
    labels_visible: bool,
    trails_visible: bool,
}

impl Orrery {
    /// Create every renderable and place it under the configured mode.
    pub fn build(
        catalog: Catalog,
        config: &ExplorerConfig,
        backend: &mut impl RenderBackend,
        rng: &mut Rng,
    ) -> EngineResult<Self> {
        let propagator = Propagator::new(config.orbit_segments);
        let clock = GlobalClock {
            mode: config.scale_mode,
            ..GlobalClock::default()
        };
        let mut store = propagator.spawn(&catalog, clock, backend, rng)?;
        propagator.set_speed(&mut store, config.speed);

        let star = catalog.bodies().iter().position(|b| b.kind == BodyKind::Star);
        let glow = match star {
            Some(i) => Some(SunGlow::spawn(catalog.bodies()[i].color, store.bodies[i].radius, backend)?),
            None => None,
        };
        let belt = match catalog.asteroid_belt() {
            Some(spec) => Some(AsteroidBelt::spawn(spec, clock.mode, backend, rng)?),
            None => None,
        };
        let starfield = spawn_starfield(config.starfield_count, config.starfield_extent, backend, rng)?;
        let picks = PickIndex::build(&store);

        log::info!(
            "orrery built: {} bodies, {} moons, {} belt particles, {:?} mode",
            catalog.bodies().len(),
            catalog.moon_count(),
            belt.as_ref().map_or(0, |b| b.len()),
            clock.mode,
        );

        Ok(Self {
            catalog,
            propagator,
            store,
            star,
            belt,
            glow,
            starfield,
            picks,
            selection: None,
            labels_visible: true,
            trails_visible: false,
        })
    }

    /// One animation tick. Returns false while paused.
    pub fn tick(&mut self, backend: &mut impl RenderBackend) -> bool {
        self.propagator.tick(&mut self.store, backend)
    }

    pub fn toggle_play(&mut self) -> bool {
        self.store.clock.playing = !self.store.clock.playing;
        log::debug!("playing: {}", self.store.clock.playing);
        self.store.clock.playing
    }

    /// Flip between compressed and realistic, rebuilding every
    /// mode-dependent geometry. Phase angles are kept.
    pub fn switch_scale_mode(&mut self, backend: &mut impl RenderBackend) -> EngineResult<ScaleMode> {
        let mode = self.store.clock.mode.toggled();
        self.propagator.switch_scale_mode(&mut self.store, mode, backend)?;
        if let Some(belt) = &mut self.belt {
            belt.rebuild(mode, backend)?;
        }
        if let (Some(glow), Some(star)) = (&self.glow, self.star) {
            glow.follow(self.store.bodies[star].radius, backend);
        }
        log::info!("scale mode: {}", mode.label());
        Ok(mode)
    }

    /// Returns the speed in effect, after clamping.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        let applied = self.propagator.set_speed(&mut self.store, speed);
        log::info!("speed: {applied:.1}x");
        applied
    }

    /// Select a body or moon. A reference that does not resolve is logged
    /// and leaves the selection unchanged.
    pub fn select(&mut self, selection: Selection) -> bool {
        if !self.picks.contains(selection) {
            log::warn!("ignoring selection of unknown {selection:?}");
            return false;
        }
        log::debug!("selected {selection:?}");
        self.selection = Some(selection);
        true
    }

    pub fn deselect(&mut self) {
        if self.selection.take().is_some() {
            log::debug!("selection cleared");
        }
    }

    pub fn toggle_labels(&mut self) -> bool {
        self.labels_visible = !self.labels_visible;
        log::debug!("labels visible: {}", self.labels_visible);
        self.labels_visible
    }

    /// Flag only; trails are not drawn.
    pub fn toggle_trails(&mut self) -> bool {
        self.trails_visible = !self.trails_visible;
        log::debug!("trails visible: {} (not rendered)", self.trails_visible);
        self.trails_visible
    }

    pub fn clock(&self) -> &GlobalClock {
        &self.store.clock
    }

    pub fn store(&self) -> &OrbitalStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn picks(&self) -> &PickIndex {
        &self.picks
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    pub fn trails_visible(&self) -> bool {
        self.trails_visible
    }

    pub fn starfield(&self) -> RenderableId {
        self.starfield
    }

    pub fn belt(&self) -> Option<&AsteroidBelt> {
        self.belt.as_ref()
    }

    /// Live world position of a body or moon.
    pub fn position(&self, selection: Selection) -> Option<Vec3> {
        let pos = match selection {
            Selection::Body(b) => self.store.bodies.get(b)?.position,
            Selection::Moon { body, moon } => self.store.moon(body, moon)?.position,
        };
        Some(pos.as_vec3())
    }

    /// Render radius under the active mode.
    pub fn radius(&self, selection: Selection) -> Option<f32> {
        let r = match selection {
            Selection::Body(b) => self.store.bodies.get(b)?.radius,
            Selection::Moon { body, moon } => self.store.moon(body, moon)?.radius,
        };
        Some(r as f32)
    }

    pub fn name(&self, selection: Selection) -> Option<&str> {
        match selection {
            Selection::Body(b) => self.catalog.body(b).map(|s| s.name.as_str()),
            Selection::Moon { body, moon } => {
                self.catalog.body(body)?.moons.get(moon).map(|m| m.name.as_str())
            }
        }
    }

    pub fn info(&self, selection: Selection) -> Option<BodyInfo> {
        match selection {
            Selection::Body(b) => self.catalog.body(b).map(BodyInfo::body),
            Selection::Moon { body, moon } => {
                let parent = self.catalog.body(body)?;
                parent.moons.get(moon).map(|m| BodyInfo::moon(m, parent))
            }
        }
    }

    pub fn selected_info(&self) -> Option<BodyInfo> {
        self.info(self.selection?)
    }

    pub fn snapshot<'a>(&self, hover: Option<&'a HoverLabel>) -> UiSnapshot<'a> {
        let clock = self.clock();
        UiSnapshot {
            scale_mode: clock.mode,
            scale_label: clock.mode.label(),
            playing: clock.playing,
            speed: clock.speed,
            ticks: clock.ticks,
            labels_visible: self.labels_visible,
            trails_visible: self.trails_visible,
            selected: self.selected_info(),
            hover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::Scene;

    fn build() -> (Orrery, Scene) {
        let mut scene = Scene::new();
        let mut rng = Rng::new(7);
        let orrery = Orrery::build(Catalog::builtin().unwrap(), &ExplorerConfig::default(), &mut scene, &mut rng).unwrap();
        (orrery, scene)
    }

    fn sphere_transforms(orrery: &Orrery, scene: &Scene) -> Vec<(Vec3, f32)> {
        orrery
            .picks()
            .candidates()
            .iter()
            .map(|&id| {
                let r = scene.get(id).unwrap();
                (r.pos, r.scale)
            })
            .collect()
    }

    #[test]
    fn build_spawns_the_whole_system() {
        let (orrery, scene) = build();
        // 22 spheres, 10 paths, glow, belt, starfield.
        assert_eq!(scene.len(), 35);
        assert_eq!(orrery.belt().unwrap().len(), 200);
        assert!(orrery.clock().playing);
        assert_eq!(orrery.clock().mode, ScaleMode::Compressed);
        assert!(!orrery.picks().candidates().contains(&orrery.starfield()));
    }

    #[test]
    fn glow_is_not_pickable_and_follows_the_sun() {
        let (mut orrery, mut scene) = build();
        let glow = orrery.glow.as_ref().unwrap().renderable();
        assert!(!orrery.picks().candidates().contains(&glow));
        orrery.switch_scale_mode(&mut scene).unwrap();
        let sun = orrery.radius(Selection::Body(0)).unwrap();
        assert!((scene.get(glow).unwrap().scale - sun * 1.1).abs() < 1e-6);
    }

    #[test]
    fn double_switch_round_trips_and_keeps_renderable_count() {
        let (mut orrery, mut scene) = build();
        for _ in 0..12 {
            orrery.tick(&mut scene);
        }
        let before = sphere_transforms(&orrery, &scene);
        let angles = orrery.store().angles();
        let count = scene.len();

        assert_eq!(orrery.switch_scale_mode(&mut scene).unwrap(), ScaleMode::Realistic);
        assert_eq!(orrery.store().angles(), angles);
        assert_eq!(orrery.switch_scale_mode(&mut scene).unwrap(), ScaleMode::Compressed);

        assert_eq!(sphere_transforms(&orrery, &scene), before);
        assert_eq!(scene.len(), count);
    }

    #[test]
    fn pause_freezes_everything() {
        let (mut orrery, mut scene) = build();
        assert!(!orrery.toggle_play());
        let before = sphere_transforms(&orrery, &scene);
        assert!(!orrery.tick(&mut scene));
        assert_eq!(sphere_transforms(&orrery, &scene), before);
        assert_eq!(orrery.clock().ticks, 0);
    }

    #[test]
    fn selection_is_validated() {
        let (mut orrery, _) = build();
        assert!(orrery.select(Selection::Moon { body: 5, moon: 2 }));
        assert_eq!(orrery.selected_info().unwrap().name, "Ganymede");
        assert!(!orrery.select(Selection::Moon { body: 5, moon: 9 }));
        assert_eq!(orrery.selection(), Some(Selection::Moon { body: 5, moon: 2 }));
        orrery.deselect();
        assert!(orrery.selected_info().is_none());
    }

    #[test]
    fn moon_position_is_parent_plus_offset() {
        let (mut orrery, mut scene) = build();
        orrery.tick(&mut scene);
        let earth = orrery.position(Selection::Body(3)).unwrap();
        let moon = orrery.store().moon(3, 0).unwrap();
        let offset = crate::state::orbital_offset(moon.orbit.angle, moon.distance).as_vec3();
        let drawn = orrery.position(Selection::Moon { body: 3, moon: 0 }).unwrap();
        assert!((drawn - (earth + offset)).length() < 1e-5);
    }

    #[test]
    fn snapshot_serializes_flags_and_selection() {
        let (mut orrery, _) = build();
        orrery.select(Selection::Body(3));
        orrery.toggle_trails();
        let hover = HoverLabel { name: "Mars".to_string(), x: 110.0, y: 60.0 };
        let json = serde_json::to_value(orrery.snapshot(Some(&hover))).unwrap();
        assert_eq!(json["scale_mode"], "compressed");
        assert_eq!(json["trails_visible"], true);
        assert_eq!(json["selected"]["name"], "Earth");
        assert_eq!(json["selected"]["distance"], "149.6 M km");
        assert_eq!(json["hover"]["name"], "Mars");
    }

    #[test]
    fn speed_is_clamped() {
        let (mut orrery, _) = build();
        assert_eq!(orrery.set_speed(25.0), 10.0);
        assert_eq!(orrery.set_speed(0.01), 0.1);
        assert_eq!(orrery.clock().speed, 0.1);
    }
}
