use serde::{Deserialize, Serialize};

use orrery_engine::EngineResult;

use crate::scale::ScaleMode;

/// Explorer settings, loaded from JSON before init. Missing fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub scale_mode: ScaleMode,
    /// Initial speed multiplier, clamped to the slider range.
    pub speed: f64,
    /// Seed for initial planet phases, belt particles and the starfield.
    pub seed: u64,
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub home_position: [f32; 3],
    /// Camera focus and reset length in display frames.
    pub transition_frames: u32,
    pub hover_throttle_ms: f64,
    pub resize_debounce_ms: f64,
    /// Segments per orbit path; the loop has one more point.
    pub orbit_segments: usize,
    /// Pointer travel in CSS pixels before a press becomes a drag.
    pub drag_threshold_px: f32,
    /// Radians of camera rotation per pixel dragged.
    pub drag_sensitivity: f32,
    /// Fraction of the camera distance per wheel notch.
    pub zoom_step: f32,
    pub starfield_count: usize,
    pub starfield_extent: f64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            scale_mode: ScaleMode::Compressed,
            speed: 1.0,
            seed: 0x5EED_0F_0E,
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1_000_000.0,
            home_position: [0.0, 50.0, 80.0],
            transition_frames: 30,
            hover_throttle_ms: 100.0,
            resize_debounce_ms: 250.0,
            orbit_segments: 64,
            drag_threshold_px: 5.0,
            drag_sensitivity: 0.005,
            zoom_step: 0.1,
            starfield_count: 1000,
            starfield_extent: 100_000.0,
        }
    }
}

impl ExplorerConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
