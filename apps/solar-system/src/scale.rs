/// Scale mapping — physical quantities to render space.
///
/// Pure math, f64 throughout. Callers convert to f32 only when writing
/// transforms into the scene.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Kilometres per render unit in realistic mode.
pub const KM_PER_UNIT: f64 = 1.0e6;
/// One astronomical unit in km.
pub const KM_PER_AU: f64 = 149.6e6;
/// Multiplier applied after the log in compressed mode.
pub const COMPRESSION: f64 = 5.0;

/// Smallest render radius per mode, so every body stays visible and pickable.
pub const REALISTIC_RADIUS_FLOOR: f64 = 0.01;
pub const COMPRESSED_RADIUS_FLOOR: f64 = 0.2;
/// Radius divisor in compressed mode (km per render unit).
pub const COMPRESSED_KM_PER_RADIUS_UNIT: f64 = 50_000.0;

/// Display frames per second the animation is tuned for.
pub const TICKS_PER_SECOND: f64 = 60.0;
/// Ticks for one simulated day at speed 1: 60 ticks/s × 60 × 24.
pub const TICKS_PER_DAY: f64 = TICKS_PER_SECOND * 60.0 * 24.0;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ScaleError {
    #[error("orbital period must be a positive number of days, got {0}")]
    InvalidPeriod(f64),
    #[error("speed multiplier must be positive and finite, got {0}")]
    InvalidSpeed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Logarithmic distances, inflated radii. Everything fits on screen.
    #[default]
    Compressed,
    /// One render unit per million km for both distances and radii.
    Realistic,
}

impl ScaleMode {
    pub fn toggled(self) -> Self {
        match self {
            ScaleMode::Compressed => ScaleMode::Realistic,
            ScaleMode::Realistic => ScaleMode::Compressed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScaleMode::Compressed => "Compressed",
            ScaleMode::Realistic => "Realistic",
        }
    }
}

/// Orbital distance in render units.
/// Compressed: `ln(au + 1) × 5`, strictly increasing and 0 at 0 km.
pub fn scaled_distance(km: f64, mode: ScaleMode) -> f64 {
    match mode {
        ScaleMode::Realistic => km / KM_PER_UNIT,
        ScaleMode::Compressed => (km / KM_PER_AU).ln_1p() * COMPRESSION,
    }
}

/// Body radius in render units, never below the mode's floor.
pub fn scaled_radius(km: f64, mode: ScaleMode) -> f64 {
    match mode {
        ScaleMode::Realistic => (km / KM_PER_UNIT).max(REALISTIC_RADIUS_FLOOR),
        ScaleMode::Compressed => (km / COMPRESSED_KM_PER_RADIUS_UNIT).max(COMPRESSED_RADIUS_FLOOR),
    }
}

/// Radians per tick for a circular orbit. Linear in `speed`.
pub fn angular_velocity(period_days: f64, speed: f64) -> Result<f64, ScaleError> {
    if !(period_days.is_finite() && period_days > 0.0) {
        return Err(ScaleError::InvalidPeriod(period_days));
    }
    if !(speed.is_finite() && speed > 0.0) {
        return Err(ScaleError::InvalidSpeed(speed));
    }
    Ok(TAU * speed / (period_days * TICKS_PER_DAY))
}
