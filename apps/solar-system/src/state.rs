/// Orbital state store — the mutable runtime side of the catalog.
///
/// Everything here is f64 and engine-free. `propagator.rs` owns the
/// renderables and pushes these positions out to the backend.

use glam::DVec3;
use orrery_engine::RenderableId;

use crate::scale::{self, ScaleError, ScaleMode};

/// Offset from the orbited point for a circular orbit in the y = 0 plane.
pub fn orbital_offset(angle: f64, distance: f64) -> DVec3 {
    DVec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Phase and rate of one circular orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalState {
    /// Radians. Never normalized and never reset by a recompute.
    pub angle: f64,
    /// Radians per tick.
    pub angular_velocity: f64,
    pub period_days: f64,
}

impl OrbitalState {
    pub fn new(angle: f64, period_days: f64, speed: f64) -> Result<Self, ScaleError> {
        Ok(Self {
            angle,
            angular_velocity: scale::angular_velocity(period_days, speed)?,
            period_days,
        })
    }

    pub fn advance(&mut self) {
        self.angle += self.angular_velocity;
    }

    /// Re-derive the rate for a new speed. On error the old rate stays.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), ScaleError> {
        self.angular_velocity = scale::angular_velocity(self.period_days, speed)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MoonState {
    /// Index of the owning body in the store (and the catalog).
    pub parent: usize,
    pub orbit: OrbitalState,
    pub distance_km: f64,
    pub radius_km: f64,
    /// Distance from the parent under the active mode.
    pub distance: f64,
    pub radius: f64,
    /// World position.
    pub position: DVec3,
    pub renderable: RenderableId,
}

#[derive(Debug, Clone)]
pub struct BodyState {
    /// `None` for the star, which is pinned at the origin.
    pub orbit: Option<OrbitalState>,
    pub distance_km: f64,
    pub radius_km: f64,
    /// Distance from the star under the active mode.
    pub distance: f64,
    pub radius: f64,
    pub position: DVec3,
    pub renderable: RenderableId,
    /// Closed loop drawn along the orbit; rebuilt on every mode switch.
    pub orbit_path: Option<RenderableId>,
    pub moons: Vec<MoonState>,
}

impl BodyState {
    /// Update distance and radius for `mode`. Angles are untouched.
    fn rescale(&mut self, mode: ScaleMode) {
        self.distance = scale::scaled_distance(self.distance_km, mode);
        self.radius = scale::scaled_radius(self.radius_km, mode);
        for moon in &mut self.moons {
            moon.distance = scale::scaled_distance(moon.distance_km, mode);
            moon.radius = scale::scaled_radius(moon.radius_km, mode);
        }
    }
}

/// Process-wide animation state, owned by the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalClock {
    /// Ticks advanced while playing.
    pub ticks: u64,
    pub playing: bool,
    pub speed: f64,
    pub mode: ScaleMode,
}

impl Default for GlobalClock {
    fn default() -> Self {
        Self {
            ticks: 0,
            playing: true,
            speed: 1.0,
            mode: ScaleMode::Compressed,
        }
    }
}

/// Runtime record of every body, in catalog order, plus the clock.
#[derive(Debug, Clone, Default)]
pub struct OrbitalStore {
    pub clock: GlobalClock,
    pub bodies: Vec<BodyState>,
}

impl OrbitalStore {
    pub fn new(clock: GlobalClock) -> Self {
        Self {
            clock,
            bodies: Vec::new(),
        }
    }

    /// One tick. Returns false (and changes nothing) while paused.
    pub fn advance(&mut self) -> bool {
        if !self.clock.playing {
            return false;
        }
        self.clock.ticks += 1;
        for body in &mut self.bodies {
            if let Some(orbit) = &mut body.orbit {
                orbit.advance();
            }
            for moon in &mut body.moons {
                moon.orbit.advance();
            }
        }
        self.update_positions();
        true
    }

    /// Recompute world positions from the current angles and distances.
    /// Each parent is placed before its moons.
    pub fn update_positions(&mut self) {
        for body in &mut self.bodies {
            body.position = match &body.orbit {
                Some(orbit) => orbital_offset(orbit.angle, body.distance),
                None => DVec3::ZERO,
            };
            let parent = body.position;
            for moon in &mut body.moons {
                moon.position = parent + orbital_offset(moon.orbit.angle, moon.distance);
            }
        }
    }

    /// Switch to `mode`, keeping every phase angle.
    pub fn set_mode(&mut self, mode: ScaleMode) {
        self.clock.mode = mode;
        for body in &mut self.bodies {
            body.rescale(mode);
        }
        self.update_positions();
    }

    /// Rescale every body under the active mode. Used after the store is filled.
    pub fn relayout(&mut self) {
        self.set_mode(self.clock.mode);
    }

    /// Re-derive every angular velocity for `speed`.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), ScaleError> {
        // Validate once so a bad speed leaves every rate untouched.
        scale::angular_velocity(1.0, speed)?;
        for body in &mut self.bodies {
            if let Some(orbit) = &mut body.orbit {
                orbit.set_speed(speed)?;
            }
            for moon in &mut body.moons {
                moon.orbit.set_speed(speed)?;
            }
        }
        self.clock.speed = speed;
        Ok(())
    }

    pub fn moon(&self, body: usize, moon: usize) -> Option<&MoonState> {
        self.bodies.get(body)?.moons.get(moon)
    }

    /// Every phase angle in store order. Bodies without an orbit are skipped.
    pub fn angles(&self) -> Vec<f64> {
        self.bodies
            .iter()
            .flat_map(|b| {
                b.orbit
                    .iter()
                    .map(|o| o.angle)
                    .chain(b.moons.iter().map(|m| m.orbit.angle))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(distance_km: f64, period_days: Option<f64>, angle: f64) -> BodyState {
        BodyState {
            orbit: period_days.map(|p| OrbitalState::new(angle, p, 1.0).unwrap()),
            distance_km,
            radius_km: 1000.0,
            distance: 0.0,
            radius: 0.0,
            position: DVec3::ZERO,
            renderable: RenderableId(1),
            orbit_path: None,
            moons: Vec::new(),
        }
    }

    fn moon(parent: usize, distance_km: f64, angle: f64) -> MoonState {
        MoonState {
            parent,
            orbit: OrbitalState::new(angle, 10.0, 1.0).unwrap(),
            distance_km,
            radius_km: 100.0,
            distance: 0.0,
            radius: 0.0,
            position: DVec3::ZERO,
            renderable: RenderableId(2),
        }
    }

    fn realistic_store() -> OrbitalStore {
        let mut store = OrbitalStore::new(GlobalClock {
            mode: ScaleMode::Realistic,
            ..GlobalClock::default()
        });
        store.bodies.push(body(0.0, None, 0.0));
        let mut planet = body(10.0e6, Some(365.25), 0.0);
        planet.moons.push(moon(1, 2.0e6, 0.0));
        store.bodies.push(planet);
        store.relayout();
        store
    }

    #[test]
    fn moon_composes_with_parent() {
        let store = realistic_store();
        assert!((store.bodies[1].position - DVec3::new(10.0, 0.0, 0.0)).length() < 1e-12);
        let m = store.moon(1, 0).unwrap();
        assert!((m.position - DVec3::new(12.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn star_stays_at_origin() {
        let mut store = realistic_store();
        for _ in 0..100 {
            store.advance();
        }
        assert_eq!(store.bodies[0].position, DVec3::ZERO);
        assert!(store.bodies[0].orbit.is_none());
    }

    #[test]
    fn bad_speed_keeps_previous_rates() {
        let mut store = realistic_store();
        let before = store.bodies[1].orbit.unwrap().angular_velocity;
        assert!(store.set_speed(0.0).is_err());
        assert_eq!(store.bodies[1].orbit.unwrap().angular_velocity, before);
        assert_eq!(store.clock.speed, 1.0);
    }

    #[test]
    fn angles_cover_bodies_and_moons() {
        let store = realistic_store();
        assert_eq!(store.angles().len(), 2);
    }
}
