/// Decoration that never orbits: the asteroid belt, the sun's glow shell and
/// the starfield. None of it is pickable.

use glam::{DVec3, Vec3};
use orrery_engine::{Color, EngineResult, Material, RenderBackend, RenderableId, Rng, Shape};

use crate::catalog::BeltSpec;
use crate::scale::{scaled_distance, ScaleMode};

const BELT_OPACITY: f32 = 0.6;
const BELT_POINT_SIZE: f32 = 1.0;
/// Particle height spread as a fraction of the belt's width.
const BELT_THICKNESS: f64 = 0.2;

const GLOW_SCALE: f32 = 1.1;
const GLOW_OPACITY: f32 = 0.2;

const STAR_OPACITY: f32 = 0.8;
const STAR_POINT_SIZE: f32 = 100.0;

/// The random draws behind one belt particle. Kept so the belt can be
/// re-laid under another scale mode without reshuffling.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Particle {
    angle: f64,
    /// Position between the inner (0) and outer (1) edge.
    radial: f64,
    /// In [-0.5, 0.5), scaled by the belt width and thickness.
    height: f64,
}

pub struct AsteroidBelt {
    inner_km: f64,
    outer_km: f64,
    material: Material,
    particles: Vec<Particle>,
    renderable: RenderableId,
}

impl AsteroidBelt {
    pub fn spawn(
        spec: &BeltSpec,
        mode: ScaleMode,
        backend: &mut impl RenderBackend,
        rng: &mut Rng,
    ) -> EngineResult<Self> {
        let particles = (0..spec.particle_count)
            .map(|_| Particle {
                angle: rng.angle(),
                radial: rng.next_f64(),
                height: rng.next_f64() - 0.5,
            })
            .collect();
        let material = Material::new(Color::from_hex(spec.color))
            .with_opacity(BELT_OPACITY)
            .with_point_size(BELT_POINT_SIZE);

        let mut belt = Self {
            inner_km: spec.inner_km,
            outer_km: spec.outer_km,
            material,
            particles,
            renderable: RenderableId(0),
        };
        belt.renderable = backend.create_renderable(Shape::Points(belt.points(mode)), material)?;
        Ok(belt)
    }

    /// Particle positions under `mode`.
    pub fn points(&self, mode: ScaleMode) -> Vec<Vec3> {
        let inner = scaled_distance(self.inner_km, mode);
        let outer = scaled_distance(self.outer_km, mode);
        let width = outer - inner;
        self.particles
            .iter()
            .map(|p| {
                let r = inner + p.radial * width;
                DVec3::new(p.angle.cos() * r, p.height * width * BELT_THICKNESS, p.angle.sin() * r).as_vec3()
            })
            .collect()
    }

    /// Release the geometry and lay the same particles out under `mode`.
    pub fn rebuild(&mut self, mode: ScaleMode, backend: &mut impl RenderBackend) -> EngineResult<()> {
        if let Err(e) = backend.remove_renderable(self.renderable) {
            log::warn!("asteroid belt geometry already gone: {e}");
        }
        self.renderable = backend.create_renderable(Shape::Points(self.points(mode)), self.material)?;
        Ok(())
    }

    pub fn renderable(&self) -> RenderableId {
        self.renderable
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Translucent shell around the star.
pub struct SunGlow {
    renderable: RenderableId,
}

impl SunGlow {
    pub fn spawn(color: u32, sun_radius: f64, backend: &mut impl RenderBackend) -> EngineResult<Self> {
        let material = Material::new(Color::from_hex(color))
            .with_opacity(GLOW_OPACITY)
            .with_emissive(1.0);
        let renderable = backend.create_renderable(Shape::Sphere, material)?;
        let glow = Self { renderable };
        glow.follow(sun_radius, backend);
        Ok(glow)
    }

    /// Match the star's render radius.
    pub fn follow(&self, sun_radius: f64, backend: &mut impl RenderBackend) {
        if let Err(e) = backend.set_scale(self.renderable, sun_radius as f32 * GLOW_SCALE) {
            log::warn!("sun glow: {e}");
        }
    }

    pub fn renderable(&self) -> RenderableId {
        self.renderable
    }
}

/// Static backdrop of random points in a cube of half-size `extent`.
pub fn spawn_starfield(
    count: usize,
    extent: f64,
    backend: &mut impl RenderBackend,
    rng: &mut Rng,
) -> EngineResult<RenderableId> {
    let points = (0..count)
        .map(|_| {
            DVec3::new(
                rng.range(-extent, extent),
                rng.range(-extent, extent),
                rng.range(-extent, extent),
            )
            .as_vec3()
        })
        .collect();
    let material = Material::new(Color::WHITE)
        .with_opacity(STAR_OPACITY)
        .with_point_size(STAR_POINT_SIZE);
    backend.create_renderable(Shape::Points(points), material)
}
