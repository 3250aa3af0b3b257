/// Celestial catalog — static description of every body, loaded once from JSON.
///
/// Units: radii and distances in km, periods in Earth days, rotation in hours.
/// Colors are `#RRGGBB` strings in the document and packed `0xRRGGBB` here.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

/// The document compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Moons without a color render in a neutral grey.
const MOON_GREY: u32 = 0xAAAAAA;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate body id `{0}`")]
    DuplicateId(String),
    #[error("catalog has {0} stars, expected exactly one")]
    StarCount(usize),
    #[error("`{id}` has a negative radius ({radius} km)")]
    NegativeRadius { id: String, radius: f64 },
    #[error("`{id}` moves but has no {field}")]
    MissingOrbit { id: String, field: &'static str },
    #[error("`{id}` has an invalid {field} ({value})")]
    InvalidOrbit { id: String, field: &'static str, value: f64 },
    #[error("`{id}` cannot be listed as a {kind:?}")]
    MisplacedKind { id: String, kind: BodyKind },
    #[error("star `{0}` cannot have an orbit")]
    StarOrbits(String),
    #[error("`{0}` cannot own moons")]
    UnexpectedMoons(String),
    #[error("asteroid belt: {0}")]
    InvalidBelt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Star,
    Planet,
    DwarfPlanet,
    Moon,
    AsteroidBelt,
}

impl BodyKind {
    /// Human-readable label for the info panel.
    pub fn label(self) -> &'static str {
        match self {
            BodyKind::Star => "Star",
            BodyKind::Planet => "Planet",
            BodyKind::DwarfPlanet => "Dwarf Planet",
            BodyKind::Moon => "Moon",
            BodyKind::AsteroidBelt => "Asteroid Belt",
        }
    }
}

fn hex_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let s = String::deserialize(deserializer)?;
    u32::from_str_radix(s.trim_start_matches('#'), 16).map_err(serde::de::Error::custom)
}

fn moon_grey() -> u32 {
    MOON_GREY
}

/// A moon, owned by its parent body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoonSpec {
    pub name: String,
    pub radius_km: f64,
    /// Distance from the parent body.
    pub orbit_distance_km: f64,
    pub orbit_period_days: f64,
    #[serde(default = "moon_grey", deserialize_with = "hex_color")]
    pub color: u32,
}

/// A star, planet or dwarf planet. The star has no orbit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BodySpec {
    pub id: String,
    pub name: String,
    pub kind: BodyKind,
    pub radius_km: f64,
    #[serde(deserialize_with = "hex_color")]
    pub color: u32,
    /// Distance from the star.
    #[serde(default)]
    pub orbit_distance_km: Option<f64>,
    #[serde(default)]
    pub orbit_period_days: Option<f64>,
    #[serde(default)]
    pub rotation_period_hours: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub moons: Vec<MoonSpec>,
}

impl BodySpec {
    /// Whether the body advances along an orbit.
    pub fn moves(&self) -> bool {
        self.orbit_period_days.is_some()
    }
}

/// Annulus of decorative particles between two orbits. Never advances.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BeltSpec {
    pub name: String,
    pub inner_km: f64,
    pub outer_km: f64,
    pub particle_count: usize,
    #[serde(deserialize_with = "hex_color")]
    pub color: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Catalog {
    bodies: Vec<BodySpec>,
    #[serde(default)]
    asteroid_belt: Option<BeltSpec>,
}

fn check_positive(id: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidOrbit { id: id.to_string(), field, value })
    }
}

fn check_radius(id: &str, radius: f64) -> Result<(), CatalogError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::NegativeRadius { id: id.to_string(), radius })
    }
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        let mut stars = 0;

        for body in &self.bodies {
            if !ids.insert(body.id.as_str()) {
                return Err(CatalogError::DuplicateId(body.id.clone()));
            }
            check_radius(&body.id, body.radius_km)?;

            match body.kind {
                BodyKind::Star => {
                    stars += 1;
                    if !body.moons.is_empty() {
                        return Err(CatalogError::UnexpectedMoons(body.id.clone()));
                    }
                    // The star stays fixed at the origin.
                    if body.orbit_distance_km.is_some() || body.orbit_period_days.is_some() {
                        return Err(CatalogError::StarOrbits(body.id.clone()));
                    }
                }
                BodyKind::Planet | BodyKind::DwarfPlanet => {
                    let distance = body.orbit_distance_km.ok_or_else(|| CatalogError::MissingOrbit {
                        id: body.id.clone(),
                        field: "orbit_distance_km",
                    })?;
                    let period = body.orbit_period_days.ok_or_else(|| CatalogError::MissingOrbit {
                        id: body.id.clone(),
                        field: "orbit_period_days",
                    })?;
                    check_positive(&body.id, "orbit_distance_km", distance)?;
                    check_positive(&body.id, "orbit_period_days", period)?;
                }
                // Moons and belts have their own record types.
                BodyKind::Moon | BodyKind::AsteroidBelt => {
                    return Err(CatalogError::MisplacedKind { id: body.id.clone(), kind: body.kind });
                }
            }

            for moon in &body.moons {
                let id = format!("{}/{}", body.id, moon.name);
                check_radius(&id, moon.radius_km)?;
                check_positive(&id, "orbit_distance_km", moon.orbit_distance_km)?;
                check_positive(&id, "orbit_period_days", moon.orbit_period_days)?;
            }
        }

        if stars != 1 {
            return Err(CatalogError::StarCount(stars));
        }

        if let Some(belt) = &self.asteroid_belt {
            if !(belt.inner_km > 0.0 && belt.outer_km.is_finite() && belt.outer_km > belt.inner_km) {
                return Err(CatalogError::InvalidBelt(format!(
                    "inner edge {} km must be positive and inside outer edge {} km",
                    belt.inner_km, belt.outer_km
                )));
            }
        }
        Ok(())
    }

    /// All bodies in catalog order. The order is stable and used as an index.
    pub fn bodies(&self) -> &[BodySpec] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&BodySpec> {
        self.bodies.get(index)
    }

    pub fn find(&self, id: &str) -> Option<(usize, &BodySpec)> {
        self.bodies.iter().enumerate().find(|(_, b)| b.id == id)
    }

    pub fn star(&self) -> Option<&BodySpec> {
        self.bodies.iter().find(|b| b.kind == BodyKind::Star)
    }

    pub fn asteroid_belt(&self) -> Option<&BeltSpec> {
        self.asteroid_belt.as_ref()
    }

    pub fn moon_count(&self) -> usize {
        self.bodies.iter().map(|b| b.moons.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r##"{
        "bodies": [
            { "id": "sun", "name": "Sun", "kind": "star", "radius_km": 696000, "color": "#FDB813" },
            { "id": "earth", "name": "Earth", "kind": "planet", "radius_km": 6371, "color": "#4CAF50",
              "orbit_distance_km": 149.6e6, "orbit_period_days": 365.25,
              "moons": [ { "name": "Moon", "radius_km": 1737, "orbit_distance_km": 384400, "orbit_period_days": 27.3 } ] }
        ]
    }"##;

    #[test]
    fn builtin_catalog_is_complete() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.bodies().len(), 11);
        assert_eq!(catalog.star().unwrap().name, "Sun");
        assert_eq!(catalog.moon_count(), 11);
        let planets = catalog.bodies().iter().filter(|b| b.kind == BodyKind::Planet).count();
        let dwarfs = catalog.bodies().iter().filter(|b| b.kind == BodyKind::DwarfPlanet).count();
        assert_eq!((planets, dwarfs), (8, 2));

        let belt = catalog.asteroid_belt().unwrap();
        assert_eq!(belt.particle_count, 200);
        assert_eq!(belt.inner_km, 330e6);
        assert_eq!(belt.outer_km, 550e6);
    }

    #[test]
    fn builtin_distances_are_ordered() {
        let catalog = Catalog::builtin().unwrap();
        let distances: Vec<f64> = catalog.bodies().iter().filter_map(|b| b.orbit_distance_km).collect();
        assert!(distances.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn colors_and_defaults_parse() {
        let catalog = Catalog::from_json(MINIMAL).unwrap();
        let (idx, earth) = catalog.find("earth").unwrap();
        assert_eq!(idx, 1);
        assert_eq!(earth.color, 0x4CAF50);
        assert_eq!(earth.moons[0].color, MOON_GREY);
        assert!(earth.description.is_none());
        assert!(!catalog.star().unwrap().moves());
        assert!(catalog.asteroid_belt().is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = MINIMAL.replace("\"id\": \"earth\"", "\"id\": \"sun\"");
        assert!(matches!(Catalog::from_json(&json), Err(CatalogError::DuplicateId(id)) if id == "sun"));
    }

    #[test]
    fn zero_period_is_rejected() {
        let json = MINIMAL.replace("\"orbit_period_days\": 365.25", "\"orbit_period_days\": 0");
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::InvalidOrbit { field: "orbit_period_days", .. })
        ));
    }

    #[test]
    fn planet_without_distance_is_rejected() {
        let json = MINIMAL.replace("\"orbit_distance_km\": 149.6e6, ", "");
        assert!(matches!(Catalog::from_json(&json), Err(CatalogError::MissingOrbit { .. })));
    }

    #[test]
    fn negative_radius_is_rejected() {
        let json = MINIMAL.replace("\"radius_km\": 1737", "\"radius_km\": -1");
        assert!(matches!(Catalog::from_json(&json), Err(CatalogError::NegativeRadius { .. })));
    }

    #[test]
    fn moon_kind_in_body_list_is_rejected() {
        let json = MINIMAL.replace("\"kind\": \"planet\"", "\"kind\": \"moon\"");
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::MisplacedKind { kind: BodyKind::Moon, .. })
        ));
    }

    #[test]
    fn star_with_an_orbit_is_rejected() {
        let moving = MINIMAL.replace(
            "\"color\": \"#FDB813\" }",
            "\"color\": \"#FDB813\", \"orbit_distance_km\": 149.6e6, \"orbit_period_days\": 10 }",
        );
        assert!(matches!(Catalog::from_json(&moving), Err(CatalogError::StarOrbits(id)) if id == "sun"));

        let period_only = MINIMAL.replace("\"color\": \"#FDB813\" }", "\"color\": \"#FDB813\", \"orbit_period_days\": 10 }");
        assert!(matches!(Catalog::from_json(&period_only), Err(CatalogError::StarOrbits(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Catalog::from_json("{ not json"), Err(CatalogError::Parse(_))));
    }
}
