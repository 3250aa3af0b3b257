/// Orbital propagator — drives the store and keeps the scene in step with it.
///
/// The store does the math; this module owns the renderables for bodies,
/// moons and orbit paths and writes transforms through `RenderBackend`.

use std::f64::consts::TAU;

use glam::Vec3;
use orrery_engine::{Color, EngineError, EngineResult, Material, RenderBackend, RenderableId, Rng, Shape};

use crate::catalog::{BodyKind, Catalog};
use crate::scale::{ScaleError, ScaleMode};
use crate::state::{orbital_offset, BodyState, GlobalClock, MoonState, OrbitalState, OrbitalStore};

const ORBIT_PATH_COLOR: u32 = 0x444444;
const ORBIT_PATH_OPACITY: f32 = 0.3;

pub const SPEED_MIN: f64 = 0.1;
pub const SPEED_MAX: f64 = 10.0;

/// Closed loop of `segments + 1` points; the last repeats the first.
pub fn orbit_path_points(distance: f64, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            // Exact closure regardless of rounding in the angle.
            let i = if i == segments { 0 } else { i };
            orbital_offset(i as f64 / segments as f64 * TAU, distance).as_vec3()
        })
        .collect()
}

fn orbit_path_material() -> Material {
    Material::new(Color::from_hex(ORBIT_PATH_COLOR)).with_opacity(ORBIT_PATH_OPACITY)
}

fn body_material(kind: BodyKind, color: u32) -> Material {
    let material = Material::new(Color::from_hex(color));
    match kind {
        BodyKind::Star => material.with_emissive(1.0),
        _ => material,
    }
}

fn invalid_orbit(name: &str, err: ScaleError) -> EngineError {
    EngineError::Init(format!("{name}: {err}"))
}

pub struct Propagator {
    path_segments: usize,
}

impl Propagator {
    pub fn new(path_segments: usize) -> Self {
        Self { path_segments }
    }

    /// Create one sphere per body and moon plus an orbit path per moving body,
    /// and place everything under `clock.mode`.
    /// Planets start at a random phase; moons are spread evenly around their parent.
    pub fn spawn(
        &self,
        catalog: &Catalog,
        clock: GlobalClock,
        backend: &mut impl RenderBackend,
        rng: &mut Rng,
    ) -> EngineResult<OrbitalStore> {
        let mut store = OrbitalStore::new(clock);

        for (index, spec) in catalog.bodies().iter().enumerate() {
            let orbit = match spec.orbit_period_days {
                Some(period) => Some(
                    OrbitalState::new(rng.angle(), period, clock.speed)
                        .map_err(|e| invalid_orbit(&spec.name, e))?,
                ),
                None => None,
            };

            let renderable = backend.create_renderable(Shape::Sphere, body_material(spec.kind, spec.color))?;
            let mut moons = Vec::with_capacity(spec.moons.len());
            let count = spec.moons.len();
            for (i, moon) in spec.moons.iter().enumerate() {
                let angle = i as f64 / count as f64 * TAU;
                let orbit = OrbitalState::new(angle, moon.orbit_period_days, clock.speed)
                    .map_err(|e| invalid_orbit(&moon.name, e))?;
                let renderable = backend.create_renderable(
                    Shape::Sphere,
                    Material::new(Color::from_hex(moon.color)),
                )?;
                moons.push(MoonState {
                    parent: index,
                    orbit,
                    distance_km: moon.orbit_distance_km,
                    radius_km: moon.radius_km,
                    distance: 0.0,
                    radius: 0.0,
                    position: Default::default(),
                    renderable,
                });
            }

            store.bodies.push(BodyState {
                orbit,
                distance_km: spec.orbit_distance_km.unwrap_or(0.0),
                radius_km: spec.radius_km,
                distance: 0.0,
                radius: 0.0,
                position: Default::default(),
                renderable,
                orbit_path: None,
                moons,
            });
        }

        store.relayout();
        self.rebuild_orbit_paths(&mut store, backend)?;
        sync_transforms(&store, backend);
        Ok(store)
    }

    /// Advance one tick and push the new transforms. A paused clock is a no-op.
    pub fn tick(&self, store: &mut OrbitalStore, backend: &mut impl RenderBackend) -> bool {
        if !store.advance() {
            return false;
        }
        sync_positions(store, backend);
        true
    }

    /// Re-place every body under `mode` from its unchanged phase angle and
    /// replace every orbit path.
    pub fn switch_scale_mode(
        &self,
        store: &mut OrbitalStore,
        mode: ScaleMode,
        backend: &mut impl RenderBackend,
    ) -> EngineResult<()> {
        store.set_mode(mode);
        self.rebuild_orbit_paths(store, backend)?;
        sync_transforms(store, backend);
        Ok(())
    }

    /// Clamp `speed` to the slider range and re-derive every rate.
    /// Returns the speed in effect afterwards.
    pub fn set_speed(&self, store: &mut OrbitalStore, speed: f64) -> f64 {
        let clamped = if speed.is_nan() { speed } else { speed.clamp(SPEED_MIN, SPEED_MAX) };
        if let Err(e) = store.set_speed(clamped) {
            log::warn!("speed {speed} rejected: {e}");
        }
        store.clock.speed
    }

    /// Release the old path geometry before creating its replacement.
    fn rebuild_orbit_paths(&self, store: &mut OrbitalStore, backend: &mut impl RenderBackend) -> EngineResult<()> {
        for body in &mut store.bodies {
            if let Some(old) = body.orbit_path.take() {
                if let Err(e) = backend.remove_renderable(old) {
                    log::warn!("orbit path {old:?} already gone: {e}");
                }
            }
            if body.orbit.is_some() {
                let points = orbit_path_points(body.distance, self.path_segments);
                body.orbit_path = Some(backend.create_renderable(Shape::Line(points), orbit_path_material())?);
            }
        }
        Ok(())
    }
}

fn warn_missing(result: EngineResult<()>) {
    if let Err(e) = result {
        log::warn!("skipping transform: {e}");
    }
}

/// Push positions only; scales change only on a mode switch.
fn sync_positions(store: &OrbitalStore, backend: &mut impl RenderBackend) {
    for body in &store.bodies {
        warn_missing(backend.set_position(body.renderable, body.position.as_vec3()));
        for moon in &body.moons {
            warn_missing(backend.set_position(moon.renderable, moon.position.as_vec3()));
        }
    }
}

fn sync_transforms(store: &OrbitalStore, backend: &mut impl RenderBackend) {
    sync_positions(store, backend);
    for body in &store.bodies {
        warn_missing(backend.set_scale(body.renderable, body.radius as f32));
        for moon in &body.moons {
            warn_missing(backend.set_scale(moon.renderable, moon.radius as f32));
        }
    }
}

/// Every sphere a pointer may resolve to, with its owner.
pub fn pickable(store: &OrbitalStore) -> impl Iterator<Item = (RenderableId, usize, Option<usize>)> + '_ {
    store.bodies.iter().enumerate().flat_map(|(b, body)| {
        std::iter::once((body.renderable, b, None))
            .chain(body.moons.iter().enumerate().map(move |(m, moon)| (moon.renderable, b, Some(m))))
    })
}
