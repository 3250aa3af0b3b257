/// Display formatting for the info panel.

use serde::Serialize;

use crate::catalog::{BodyKind, BodySpec, MoonSpec};
use crate::scale::KM_PER_AU;

const DAYS_PER_YEAR: f64 = 365.25;
/// Distances beyond this many AU are shown in AU instead of km.
const AU_DISPLAY_THRESHOLD: f64 = 1.5;
const MISSING: &str = "-";

/// One decimal with a B/M/K suffix: `1500.0` is "1.5 K".
pub fn format_number(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.1} B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.1} M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.1} K", value / 1e3)
    } else {
        format!("{value:.1}")
    }
}

pub fn format_distance(km: f64) -> String {
    if km > KM_PER_AU * AU_DISPLAY_THRESHOLD {
        format!("{:.2} AU", km / KM_PER_AU)
    } else {
        format!("{} km", format_number(km))
    }
}

pub fn format_period(days: f64) -> String {
    if days > DAYS_PER_YEAR {
        format!("{:.1} years", days / DAYS_PER_YEAR)
    } else {
        format!("{} days", format_number(days))
    }
}

fn or_missing(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map(f).unwrap_or_else(|| MISSING.to_string())
}

/// Formatted fields for the selected body. Absent values read "-".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyInfo {
    pub name: String,
    pub kind: &'static str,
    pub radius: String,
    /// From the star for bodies, from the parent for moons.
    pub distance: String,
    pub period: String,
    pub rotation: String,
    pub description: String,
}

impl BodyInfo {
    pub fn body(spec: &BodySpec) -> Self {
        Self {
            name: spec.name.clone(),
            kind: spec.kind.label(),
            radius: format!("{} km", format_number(spec.radius_km)),
            distance: or_missing(spec.orbit_distance_km, format_distance),
            period: or_missing(spec.orbit_period_days, format_period),
            rotation: or_missing(spec.rotation_period_hours, |h| format!("{} hours", format_number(h))),
            description: spec.description.clone().unwrap_or_else(|| MISSING.to_string()),
        }
    }

    pub fn moon(spec: &MoonSpec, parent: &BodySpec) -> Self {
        Self {
            name: spec.name.clone(),
            kind: BodyKind::Moon.label(),
            radius: format!("{} km", format_number(spec.radius_km)),
            distance: format_distance(spec.orbit_distance_km),
            period: format_period(spec.orbit_period_days),
            rotation: MISSING.to_string(),
            description: format!("Moon of {}", parent.name),
        }
    }
}
